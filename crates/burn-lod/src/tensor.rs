use ndarray::{ArcArray, Array2, ArrayD, ArrayView2, IxDyn};

use crate::{element::LodElement, ops::TensorMeta, Error, Lod, Result, Shape};

/// A batch of variable-length sequences: rows stored along the first axis and the
/// [level-of-detail](Lod) offsets describing how they group into sequences.
#[derive(Debug, Clone)]
pub struct LodTensor<E> {
    array: ArcArray<E, IxDyn>,
    lod: Lod,
}

impl<E: LodElement> LodTensor<E> {
    /// Creates a tensor from an array, checking the LoD against its row count.
    pub fn from_array(array: ArrayD<E>, lod: impl Into<Lod>) -> Result<Self> {
        if array.ndim() == 0 {
            return Err(Error::invalid_argument(
                "a LoD tensor needs at least one dimension",
            ));
        }

        let lod = lod.into();
        lod.validate(array.shape()[0])?;

        let array = if array.is_standard_layout() {
            array
        } else {
            array.as_standard_layout().into_owned()
        };

        Ok(Self {
            array: array.into_shared(),
            lod,
        })
    }

    /// Creates a tensor from flat row-major data.
    pub fn from_rows<S: Into<Shape>>(data: Vec<E>, shape: S, lod: impl Into<Lod>) -> Result<Self> {
        let shape = shape.into();

        if shape.num_elements() != data.len() {
            return Err(Error::shape_mismatch(format!(
                "shape {:?} holds {} elements, got {}",
                shape.dims,
                shape.num_elements(),
                data.len()
            )));
        }

        let array = ArrayD::from_shape_vec(IxDyn(&shape.dims), data)
            .map_err(|err| Error::shape_mismatch(err.to_string()))?;

        Self::from_array(array, lod)
    }

    /// Creates a tensor filled with zeros.
    pub fn zeros<S: Into<Shape>>(shape: S, lod: impl Into<Lod>) -> Result<Self> {
        let shape = shape.into();

        Self::from_array(ArrayD::zeros(IxDyn(&shape.dims)), lod)
    }

    pub(crate) fn from_row_array(rows: Array2<E>, row_dims: &[usize], lod: Lod) -> Result<Self> {
        let mut dims = Vec::with_capacity(row_dims.len() + 1);
        dims.push(rows.nrows());
        dims.extend_from_slice(row_dims);

        let array = rows
            .into_shape_with_order(IxDyn(&dims))
            .map_err(|err| Error::shape_mismatch(err.to_string()))?;

        Self::from_array(array, lod)
    }

    /// Replaces the LoD.
    pub fn with_lod(self, lod: impl Into<Lod>) -> Result<Self> {
        let lod = lod.into();
        lod.validate(self.num_rows())?;

        Ok(Self {
            array: self.array,
            lod,
        })
    }

    /// The shape of the tensor.
    pub fn shape(&self) -> Shape {
        Shape::from(self.array.shape())
    }

    /// The LoD of the tensor.
    pub fn lod(&self) -> &Lod {
        &self.lod
    }

    /// The underlying array.
    pub fn array(&self) -> &ArcArray<E, IxDyn> {
        &self.array
    }

    /// Size of the row axis.
    pub fn num_rows(&self) -> usize {
        self.array.shape()[0]
    }

    /// Number of elements in a single row.
    pub fn row_width(&self) -> usize {
        self.array.shape()[1..].iter().product()
    }

    /// A two dimensional view where each row of the tensor is flattened.
    pub fn rows(&self) -> Result<ArrayView2<'_, E>> {
        self.array
            .view()
            .into_shape_with_order((self.num_rows(), self.row_width()))
            .map_err(|err| Error::shape_mismatch(err.to_string()))
    }

    /// Copies the elements in row-major order.
    pub fn to_vec(&self) -> Vec<E> {
        self.array.iter().copied().collect()
    }

    /// Shape and LoD of the tensor, without its data.
    pub fn meta(&self) -> TensorMeta {
        TensorMeta::new(self.shape(), self.lod.clone())
    }
}
