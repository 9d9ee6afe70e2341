use alloc::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Suffix of the variable holding the gradient of another variable.
pub const GRAD_SUFFIX: &str = "@GRAD";

/// Name of the variable holding the gradient of `name`.
pub fn grad_var_name(name: &str) -> String {
    format!("{name}{GRAD_SUFFIX}")
}

/// Value of an operator attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// A string.
    String(String),
}

/// Description of an operator call: its type, the variables bound to its input and output
/// slots, and its attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpDesc {
    /// Name of the operator in the [registry](super::OpRegistry).
    pub op_type: String,
    /// Input slot to variable name.
    pub inputs: BTreeMap<String, String>,
    /// Output slot to variable name.
    pub outputs: BTreeMap<String, String>,
    /// Attribute name to value.
    pub attrs: BTreeMap<String, Attribute>,
}

impl OpDesc {
    /// Creates a description without slots nor attributes.
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            ..Default::default()
        }
    }

    /// Binds a variable to an input slot.
    pub fn with_input(mut self, slot: impl Into<String>, var: impl Into<String>) -> Self {
        self.inputs.insert(slot.into(), var.into());
        self
    }

    /// Binds a variable to an output slot.
    pub fn with_output(mut self, slot: impl Into<String>, var: impl Into<String>) -> Self {
        self.outputs.insert(slot.into(), var.into());
        self
    }

    /// Sets an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: Attribute) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    /// The variable bound to an input slot.
    pub fn input(&self, slot: &str) -> Option<&str> {
        self.inputs.get(slot).map(String::as_str)
    }

    /// The variable bound to an output slot.
    pub fn output(&self, slot: &str) -> Option<&str> {
        self.outputs.get(slot).map(String::as_str)
    }

    /// The variable bound to an input slot the operator can't run without.
    pub fn required_input(&self, slot: &str) -> Result<&str> {
        self.input(slot).ok_or_else(|| {
            Error::invalid_argument(format!(
                "Input({slot}) of {} should not be null.",
                self.op_type
            ))
        })
    }

    /// The variable bound to an output slot the operator can't run without.
    pub fn required_output(&self, slot: &str) -> Result<&str> {
        self.output(slot).ok_or_else(|| {
            Error::invalid_argument(format!(
                "Output({slot}) of {} should not be null.",
                self.op_type
            ))
        })
    }

    /// An integer attribute, `None` when it isn't set.
    pub fn attr_int(&self, name: &str) -> Result<Option<i64>> {
        match self.attrs.get(name) {
            Some(Attribute::Int(value)) => Ok(Some(*value)),
            Some(other) => Err(Error::invalid_argument(format!(
                "attribute {name} of {} should be an integer, got {other:?}",
                self.op_type
            ))),
            None => Ok(None),
        }
    }
}
