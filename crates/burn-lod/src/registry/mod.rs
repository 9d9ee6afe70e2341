//! A table of operators, each one being a shape inference function, a compute function
//! and an optional gradient description.

mod base;
mod desc;
mod scope;
mod sequence;

pub use base::*;
pub use desc::*;
pub use scope::*;
pub use sequence::{SEQ_EXPAND, SEQ_EXPAND_GRAD};
