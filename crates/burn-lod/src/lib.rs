#![warn(missing_docs)]

//! Sequence expansion over level-of-detail (LoD) tensors.
//!
//! A LoD tensor packs a batch of variable-length sequences into a single buffer: rows are
//! stored along the first axis and nested offset levels tell where each sequence starts
//! and ends. [seq_expand] repeats every sequence, either a fixed number of times or as
//! many times as the matching segment of a reference batch is long, and
//! [seq_expand_grad] sums the gradients of the replicas back onto the original rows.
//!
//! The [registry] exposes both as the `seq_expand` and `seq_expand_grad` operators.

#[macro_use]
extern crate derive_new;

extern crate alloc;

mod parallel;

/// Configuration of the operators.
pub mod config;
/// Level-of-detail offsets.
pub mod lod;
/// Sequence operations.
pub mod ops;
pub mod registry;

mod element;
mod error;
mod shape;
mod tensor;

pub use config::{Config, SeqExpandConfig};
pub use element::*;
pub use error::*;
pub use lod::Lod;
pub use ops::{
    infer_shape, reduce_grad, seq_expand, seq_expand_grad, ExpandPlan, RepeatSpec, TensorMeta,
};
pub use shape::*;
pub use tensor::*;
