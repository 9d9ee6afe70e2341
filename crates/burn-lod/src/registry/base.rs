use alloc::collections::BTreeMap;
use std::collections::HashMap;

use super::{sequence, OpDesc, Scope};
use crate::{element::LodElement, ops::TensorMeta, Error, Result};

/// Shape and LoD of named variables, used to infer shapes before running anything.
pub type MetaScope = BTreeMap<String, TensorMeta>;

/// Infers the metadata of the outputs of an operator and stores it in the scope.
pub type InferShapeFn = fn(&OpDesc, &mut MetaScope) -> Result<()>;

/// Runs an operator, reading its inputs from the scope and storing its outputs.
pub type ComputeFn<E> = fn(&OpDesc, &mut Scope<E>) -> Result<()>;

/// Builds the description of the gradient operator of an operator call.
pub type GradFn = fn(&OpDesc) -> Result<OpDesc>;

/// Everything the registry knows about an operator.
pub struct OpInfo<E> {
    /// Shape inference.
    pub infer_shape: InferShapeFn,
    /// Forward computation.
    pub compute: ComputeFn<E>,
    /// Gradient description, `None` when the operator isn't differentiable.
    pub grad: Option<GradFn>,
}

impl<E> Clone for OpInfo<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for OpInfo<E> {}

impl<E> core::fmt::Debug for OpInfo<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OpInfo")
            .field("has_grad", &self.grad.is_some())
            .finish()
    }
}

/// Operators by name.
#[derive(Debug)]
pub struct OpRegistry<E> {
    ops: HashMap<String, OpInfo<E>>,
}

impl<E> Default for OpRegistry<E> {
    fn default() -> Self {
        Self {
            ops: HashMap::new(),
        }
    }
}

impl<E: LodElement> OpRegistry<E> {
    /// Creates a registry holding the sequence operators.
    pub fn with_sequence_ops() -> Self {
        let mut registry = Self::default();
        sequence::register(&mut registry);

        registry
    }
}

impl<E> OpRegistry<E> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an operator, failing when the name is taken.
    pub fn register(&mut self, name: impl Into<String>, info: OpInfo<E>) -> Result<()> {
        let name = name.into();

        if self.ops.contains_key(&name) {
            return Err(Error::invalid_argument(format!(
                "operator {name} is already registered"
            )));
        }

        self.ops.insert(name, info);
        Ok(())
    }

    pub(crate) fn insert(&mut self, name: &str, info: OpInfo<E>) {
        self.ops.insert(name.to_string(), info);
    }

    /// Whether an operator is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// The operator with the given name.
    pub fn get(&self, name: &str) -> Result<&OpInfo<E>> {
        self.ops
            .get(name)
            .ok_or_else(|| Error::invalid_argument(format!("operator {name} is not registered")))
    }

    /// Runs the operator described by `desc` on the variables of `scope`.
    pub fn run(&self, desc: &OpDesc, scope: &mut Scope<E>) -> Result<()> {
        let info = self.get(&desc.op_type)?;
        log::trace!("Running operator {}", desc.op_type);

        (info.compute)(desc, scope)
    }

    /// Infers the shapes of the outputs of the operator described by `desc`.
    pub fn infer_shape(&self, desc: &OpDesc, metas: &mut MetaScope) -> Result<()> {
        let info = self.get(&desc.op_type)?;
        log::trace!("Inferring shapes of operator {}", desc.op_type);

        (info.infer_shape)(desc, metas)
    }

    /// The description of the gradient operator of `desc`.
    pub fn grad_op_desc(&self, desc: &OpDesc) -> Result<OpDesc> {
        let info = self.get(&desc.op_type)?;
        let grad = info.grad.ok_or_else(|| {
            Error::invalid_argument(format!("operator {} has no gradient", desc.op_type))
        })?;

        grad(desc)
    }
}
