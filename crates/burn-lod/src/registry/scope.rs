use std::collections::HashMap;

use crate::{Error, LodTensor, Result};

/// Named variables read and written by operators.
#[derive(Debug, Clone)]
pub struct Scope<E> {
    vars: HashMap<String, LodTensor<E>>,
}

impl<E> Default for Scope<E> {
    fn default() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }
}

impl<E> Scope<E> {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a variable, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, tensor: LodTensor<E>) -> Option<LodTensor<E>> {
        self.vars.insert(name.into(), tensor)
    }

    /// The variable with the given name.
    pub fn get(&self, name: &str) -> Option<&LodTensor<E>> {
        self.vars.get(name)
    }

    /// The variable with the given name, failing when it doesn't exist.
    pub fn var(&self, name: &str) -> Result<&LodTensor<E>> {
        self.get(name)
            .ok_or_else(|| Error::invalid_argument(format!("variable {name} is not in the scope")))
    }

    /// Removes a variable.
    pub fn remove(&mut self, name: &str) -> Option<LodTensor<E>> {
        self.vars.remove(name)
    }

    /// Whether a variable exists.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the scope holds no variable.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
