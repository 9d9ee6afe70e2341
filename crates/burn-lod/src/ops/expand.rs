use ndarray::{Array1, Array2, ArrayView2, Zip};

use super::{ExpandPlan, RepeatSpec};
use crate::{
    element::LodElement,
    parallel::{run_par, zip_par},
    Error, LodTensor, Result,
};

/// Repeats every sequence of `x`.
///
/// With [RepeatSpec::Fixed] each sequence is repeated the same number of times. With
/// [RepeatSpec::ReferenceDriven], sequence `i` is repeated as many times as segment `i`
/// of the first LoD level of `reference` is long.
///
/// When `x` has no LoD, each of its rows is a sequence.
///
/// # Example
///
/// ```rust
/// use burn_lod::{seq_expand, LodTensor, RepeatSpec};
///
/// let x = LodTensor::from_rows(vec![1.0_f32, 2.0, 3.0], [3], vec![vec![0, 1, 2, 3]]).unwrap();
/// let out = seq_expand(&x, None, RepeatSpec::Fixed(2)).unwrap();
///
/// assert_eq!(out.to_vec(), vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
/// assert_eq!(out.lod().level(0), Some(&[0, 2, 4, 6][..]));
/// ```
pub fn seq_expand<E: LodElement>(
    x: &LodTensor<E>,
    reference: Option<&LodTensor<E>>,
    repeat: RepeatSpec,
) -> Result<LodTensor<E>> {
    let offsets = x.lod().top_level(x.num_rows());
    let repeats = repeat.repeats(offsets.len() - 1, reference.map(LodTensor::lod))?;
    let plan = ExpandPlan::new(&offsets, &repeats)?;

    log::debug!(
        "Expanding {} sequences ({} rows) into {} rows with {:?}",
        plan.segments().len(),
        plan.input_rows(),
        plan.output_rows(),
        repeat
    );

    let output = expand_rows(x.rows()?, &plan)?;
    let shape = x.shape();

    LodTensor::from_row_array(output, shape.row_dims(), plan.expand_lod(x.lod()))
}

/// Copies the rows of every sequence as many times as the plan says, in order.
pub fn expand_rows<E: LodElement>(rows: ArrayView2<'_, E>, plan: &ExpandPlan) -> Result<Array2<E>> {
    if rows.nrows() != plan.input_rows() {
        return Err(Error::shape_mismatch(format!(
            "the plan expands {} rows, got {}",
            plan.input_rows(),
            rows.nrows()
        )));
    }

    let sources = Array1::from(plan.source_rows());
    let mut output = Array2::zeros((plan.output_rows(), rows.ncols()));

    run_par!(|| {
        zip_par!(
            Zip::from(output.rows_mut()).and(&sources),
            |mut row, source: &usize| row.assign(&rows.row(*source))
        );
    });

    Ok(output)
}
