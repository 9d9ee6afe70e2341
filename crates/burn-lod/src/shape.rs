use serde::{Deserialize, Serialize};

/// Shape of a tensor, the first dimension being the row axis.
#[derive(new, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// The dimensions of the tensor.
    pub dims: Vec<usize>,
}

impl Shape {
    /// Returns the total number of elements of a tensor having this shape
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Number of dimensions.
    pub fn num_dims(&self) -> usize {
        self.dims.len()
    }

    /// Size of the row axis.
    pub fn num_rows(&self) -> usize {
        self.dims.first().copied().unwrap_or(0)
    }

    /// Dimensions of a single row.
    pub fn row_dims(&self) -> &[usize] {
        self.dims.get(1..).unwrap_or(&[])
    }

    /// Number of elements in a single row.
    pub fn row_width(&self) -> usize {
        self.row_dims().iter().product()
    }
}

impl<const D: usize> From<[usize; D]> for Shape {
    fn from(dims: [usize; D]) -> Self {
        Shape::new(dims.to_vec())
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::new(dims.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_elements() {
        let dims = [2, 3, 4, 5];
        let shape = Shape::from(dims);
        assert_eq!(120, shape.num_elements());
    }

    #[test]
    fn row_width() {
        let shape = Shape::from([6, 3, 2]);

        assert_eq!(shape.num_rows(), 6);
        assert_eq!(shape.row_dims(), &[3, 2]);
        assert_eq!(shape.row_width(), 6);
        assert_eq!(Shape::from([4]).row_width(), 1);
    }
}
