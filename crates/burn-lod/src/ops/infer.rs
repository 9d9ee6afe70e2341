use serde::{Deserialize, Serialize};

use super::{ExpandPlan, RepeatSpec};
use crate::{Error, Lod, Result, Shape};

/// Shape and LoD of a tensor, without its data.
#[derive(new, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorMeta {
    /// The shape of the tensor.
    pub shape: Shape,
    /// The LoD of the tensor.
    pub lod: Lod,
}

/// Shape and LoD of the output of [seq_expand](super::seq_expand), computed without
/// touching any data.
pub fn infer_shape(
    x: &TensorMeta,
    reference: Option<&TensorMeta>,
    repeat: RepeatSpec,
) -> Result<TensorMeta> {
    if x.shape.num_dims() == 0 {
        return Err(Error::invalid_argument(
            "the input of seq_expand needs at least one dimension",
        ));
    }

    let rows = x.shape.num_rows();
    x.lod.validate(rows)?;
    if let Some(reference) = reference {
        reference.lod.validate(reference.shape.num_rows())?;
    }

    let offsets = x.lod.top_level(rows);
    let repeats = repeat.repeats(offsets.len() - 1, reference.map(|meta| &meta.lod))?;
    let plan = ExpandPlan::new(&offsets, &repeats)?;

    let mut dims = x.shape.dims.clone();
    dims[0] = plan.output_rows();

    Ok(TensorMeta::new(Shape::new(dims), plan.expand_lod(&x.lod)))
}

/// The gradient of [seq_expand](super::seq_expand) has the shape and LoD of its input.
pub fn infer_grad_shape(x: &TensorMeta) -> TensorMeta {
    x.clone()
}
