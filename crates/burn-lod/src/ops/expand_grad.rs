use ndarray::{Array1, Array2, ArrayView2, Zip};

use super::{ExpandPlan, RepeatSpec, RowReplicas};
use crate::{
    element::LodElement,
    parallel::{run_par, zip_par},
    Error, LodTensor, Result,
};

/// Gradient of [seq_expand](super::seq_expand) with respect to `x`.
///
/// The output offsets are read from the first LoD level of `out_grad`. When the gradient
/// carries no LoD, they are recomputed from `x`, `repeat` and `reference`, the same way
/// the forward pass computed them.
pub fn seq_expand_grad<E: LodElement>(
    x: &LodTensor<E>,
    out_grad: &LodTensor<E>,
    repeat: RepeatSpec,
    reference: Option<&LodTensor<E>>,
) -> Result<LodTensor<E>> {
    if out_grad.row_width() != x.row_width() {
        return Err(Error::shape_mismatch(format!(
            "the gradient rows have {} elements but the input rows have {}",
            out_grad.row_width(),
            x.row_width()
        )));
    }

    let input_offsets = x.lod().top_level(x.num_rows());
    let plan = match out_grad.lod().level(0) {
        Some(output_offsets) => ExpandPlan::from_output_offsets(output_offsets, &input_offsets)?,
        None => {
            let repeats = repeat.repeats(input_offsets.len() - 1, reference.map(LodTensor::lod))?;
            ExpandPlan::new(&input_offsets, &repeats)?
        }
    };

    let grad = reduce_rows(out_grad.rows()?, &plan)?;
    let shape = x.shape();

    LodTensor::from_row_array(grad, shape.row_dims(), x.lod().clone())
}

/// Sums the gradient of every replica back onto the row it was copied from.
///
/// `output_offsets` is the first LoD level of the expanded output and `input_offsets` the
/// one of the original input.
pub fn reduce_grad<E: LodElement>(
    output_grad: ArrayView2<'_, E>,
    output_offsets: &[usize],
    input_offsets: &[usize],
) -> Result<Array2<E>> {
    let plan = ExpandPlan::from_output_offsets(output_offsets, input_offsets)?;

    reduce_rows(output_grad, &plan)
}

/// Sums, for every input row, the gradient rows of its replicas.
pub fn reduce_rows<E: LodElement>(
    output_grad: ArrayView2<'_, E>,
    plan: &ExpandPlan,
) -> Result<Array2<E>> {
    if output_grad.nrows() != plan.output_rows() {
        return Err(Error::shape_mismatch(format!(
            "the gradient has {} rows but the expanded output has {}",
            output_grad.nrows(),
            plan.output_rows()
        )));
    }

    let replicas = Array1::from(plan.replicas_of_rows());
    let mut grad = Array2::zeros((plan.input_rows(), output_grad.ncols()));

    run_par!(|| {
        zip_par!(
            Zip::from(grad.rows_mut()).and(&replicas),
            |mut row, replicas: &RowReplicas| {
                for replica in 0..replicas.count {
                    let value = output_grad.row(replicas.first + replica * replicas.stride);
                    row.zip_mut_with(&value, |a, b| *a += *b);
                }
            }
        );
    });

    Ok(grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ops::seq_expand, Lod};
    use ndarray::array;

    #[test]
    fn should_sum_replicas() {
        let output_grad = array![[1.0], [2.0], [10.0], [20.0], [100.0], [200.0]];

        let grad = reduce_grad(output_grad.view(), &[0, 2, 4, 6], &[0, 1, 2, 3]).unwrap();

        assert_eq!(grad, array![[3.0], [30.0], [300.0]]);
    }

    #[test]
    fn should_sum_by_position_in_sequence() {
        let output_grad = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0], [5.0, 5.0]];

        let grad = reduce_grad(output_grad.view(), &[0, 4, 5], &[0, 2, 3]).unwrap();

        assert_eq!(grad, array![[4.0, 4.0], [6.0, 6.0], [5.0, 5.0]]);
    }

    #[test]
    fn should_give_zero_gradient_to_elided_sequences() {
        let output_grad = array![[1.0], [2.0]];

        let grad = reduce_grad(output_grad.view(), &[0, 0, 2], &[0, 1, 2]).unwrap();

        assert_eq!(grad, array![[0.0], [3.0]]);
    }

    #[test]
    fn should_reject_gradient_with_wrong_row_count() {
        let output_grad = array![[1.0], [2.0], [3.0]];

        let err = reduce_grad(output_grad.view(), &[0, 2, 4], &[0, 1, 2]).unwrap_err();

        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn should_use_gradient_lod() {
        let x = LodTensor::from_rows(vec![1.0, 2.0, 3.0], [3], Lod::default()).unwrap();
        let out = seq_expand(&x, None, RepeatSpec::Fixed(2)).unwrap();
        let out_grad = LodTensor::from_rows(
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            [6],
            out.lod().clone(),
        )
        .unwrap();

        let grad = seq_expand_grad(&x, &out_grad, RepeatSpec::Fixed(2), None).unwrap();

        assert_eq!(grad.to_vec(), vec![3.0, 7.0, 11.0]);
        assert_eq!(grad.shape(), x.shape());
    }

    #[test]
    fn should_recompute_offsets_without_gradient_lod() {
        let x = LodTensor::from_rows(vec![1.0, 2.0, 3.0], [3], vec![vec![0, 1, 2, 3]]).unwrap();
        let y = LodTensor::zeros([5], vec![vec![0, 2, 2, 5]]).unwrap();
        let out_grad =
            LodTensor::from_rows(vec![1.0, 2.0, 3.0, 4.0, 5.0], [5], Lod::default()).unwrap();

        let grad = seq_expand_grad(&x, &out_grad, RepeatSpec::ReferenceDriven, Some(&y)).unwrap();

        assert_eq!(grad.to_vec(), vec![3.0, 0.0, 12.0]);
        assert_eq!(grad.lod(), x.lod());
    }

    #[test]
    fn should_reject_gradient_with_other_row_width() {
        let x = LodTensor::from_rows(vec![1.0, 2.0], [2, 1], Lod::default()).unwrap();
        let out_grad = LodTensor::from_rows(vec![1.0; 8], [4, 2], Lod::default()).unwrap();

        let err = seq_expand_grad(&x, &out_grad, RepeatSpec::Fixed(2), None).unwrap_err();

        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }
}
