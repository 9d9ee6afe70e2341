mod expand;
mod expand_grad;
mod infer;
mod plan;
mod repeat;

pub use expand::*;
pub use expand_grad::*;
pub use infer::*;
pub use plan::*;
pub use repeat::*;
