use super::{grad_var_name, MetaScope, OpDesc, OpInfo, OpRegistry, Scope};
use crate::{
    config::SeqExpandConfig,
    element::LodElement,
    ops::{infer_grad_shape, infer_shape, seq_expand, seq_expand_grad, TensorMeta},
    Error, Result,
};

/// Name of the sequence expansion operator.
pub const SEQ_EXPAND: &str = "seq_expand";
/// Name of the gradient of the sequence expansion operator.
pub const SEQ_EXPAND_GRAD: &str = "seq_expand_grad";

const X: &str = "X";
const Y: &str = "Y";
const OUT: &str = "Out";

pub(crate) fn register<E: LodElement>(registry: &mut OpRegistry<E>) {
    let ops = [
        (
            SEQ_EXPAND,
            OpInfo {
                infer_shape: seq_expand_infer_shape,
                compute: seq_expand_compute::<E>,
                grad: Some(seq_expand_grad_desc),
            },
        ),
        (
            SEQ_EXPAND_GRAD,
            OpInfo {
                infer_shape: seq_expand_grad_infer_shape,
                compute: seq_expand_grad_compute::<E>,
                grad: None,
            },
        ),
    ];

    for (name, info) in ops {
        registry.insert(name, info);
    }
}

fn seq_expand_infer_shape(desc: &OpDesc, metas: &mut MetaScope) -> Result<()> {
    let repeat = SeqExpandConfig::from_attrs(desc)?.repeat_spec()?;
    let x = meta(metas, desc.required_input(X)?)?;
    let reference = match desc.input(Y) {
        Some(name) => Some(meta(metas, name)?),
        None => None,
    };

    let out = infer_shape(x, reference, repeat)?;
    metas.insert(desc.required_output(OUT)?.to_string(), out);

    Ok(())
}

fn seq_expand_compute<E: LodElement>(desc: &OpDesc, scope: &mut Scope<E>) -> Result<()> {
    let repeat = SeqExpandConfig::from_attrs(desc)?.repeat_spec()?;
    let x = scope.var(desc.required_input(X)?)?;
    let reference = match desc.input(Y) {
        Some(name) => Some(scope.var(name)?),
        None => None,
    };

    let out = seq_expand(x, reference, repeat)?;
    scope.insert(desc.required_output(OUT)?, out);

    Ok(())
}

fn seq_expand_grad_desc(desc: &OpDesc) -> Result<OpDesc> {
    let x = desc.required_input(X)?;
    let out = desc.required_output(OUT)?;

    let mut grad = OpDesc::new(SEQ_EXPAND_GRAD)
        .with_input(X, x)
        .with_input(grad_var_name(OUT), grad_var_name(out))
        .with_output(grad_var_name(X), grad_var_name(x));

    if let Some(y) = desc.input(Y) {
        grad = grad.with_input(Y, y);
    }

    grad.attrs = desc.attrs.clone();

    Ok(grad)
}

fn seq_expand_grad_infer_shape(desc: &OpDesc, metas: &mut MetaScope) -> Result<()> {
    let x = meta(metas, desc.required_input(X)?)?;
    meta(metas, desc.required_input(&grad_var_name(OUT))?)?;

    if let Some(x_grad) = desc.output(&grad_var_name(X)) {
        let grad = infer_grad_shape(x);
        metas.insert(x_grad.to_string(), grad);
    }

    Ok(())
}

fn seq_expand_grad_compute<E: LodElement>(desc: &OpDesc, scope: &mut Scope<E>) -> Result<()> {
    let Some(x_grad) = desc.output(&grad_var_name(X)) else {
        log::trace!("No output gradient requested for {}", desc.op_type);
        return Ok(());
    };

    let repeat = SeqExpandConfig::from_attrs(desc)?.repeat_spec()?;
    let x = scope.var(desc.required_input(X)?)?;
    let out_grad = scope.var(desc.required_input(&grad_var_name(OUT))?)?;
    let reference = match desc.input(Y) {
        Some(name) => Some(scope.var(name)?),
        None => None,
    };

    let grad = seq_expand_grad(x, out_grad, repeat, reference)?;
    scope.insert(x_grad, grad);

    Ok(())
}

fn meta<'a>(metas: &'a MetaScope, name: &str) -> Result<&'a TensorMeta> {
    metas
        .get(name)
        .ok_or_else(|| Error::invalid_argument(format!("variable {name} has no shape")))
}
