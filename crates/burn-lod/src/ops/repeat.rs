use serde::{Deserialize, Serialize};

use crate::{
    lod::{check_offsets, segment_lengths},
    Error, Lod, Result,
};

/// How many times each sequence is repeated by [seq_expand](crate::ops::seq_expand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatSpec {
    /// Every sequence is repeated the same number of times.
    Fixed(usize),
    /// Sequence `i` is repeated as many times as the length of segment `i` in the first
    /// LoD level of a reference batch.
    ReferenceDriven,
}

impl RepeatSpec {
    /// Interprets the integer `repeat` attribute: `0` selects the reference batch, a
    /// positive value is a fixed repeat count.
    pub fn from_attr(repeat: i32) -> Result<Self> {
        match repeat {
            0 => Ok(Self::ReferenceDriven),
            repeat if repeat > 0 => Ok(Self::Fixed(repeat as usize)),
            repeat => Err(Error::invalid_argument(format!(
                "the repeat attribute must not be negative, got {repeat}"
            ))),
        }
    }

    /// The repeat count of each of the `num_segments` sequences.
    ///
    /// `reference` is the LoD of the reference batch and is only read in
    /// [reference mode](RepeatSpec::ReferenceDriven).
    pub fn repeats(&self, num_segments: usize, reference: Option<&Lod>) -> Result<Vec<usize>> {
        match self {
            Self::Fixed(repeat) => Ok(vec![*repeat; num_segments]),
            Self::ReferenceDriven => {
                let reference = reference.ok_or_else(|| {
                    Error::invalid_argument(
                        "a reference batch is required when repeating by reference",
                    )
                })?;
                let level = reference.level(0).ok_or_else(|| {
                    Error::invalid_argument("the reference batch has no LoD level")
                })?;
                check_offsets(level, level.last().copied().unwrap_or(0)).map_err(|err| match err {
                    Error::InvalidArgument { reason } => {
                        Error::invalid_argument(format!("reference LoD: {reason}"))
                    }
                    err => err,
                })?;
                let reference_segments = level.len() - 1;

                if reference_segments != num_segments {
                    return Err(Error::invalid_argument(format!(
                        "the reference batch has {reference_segments} sequences in its first LoD \
                         level but the input has {num_segments}"
                    )));
                }

                Ok(segment_lengths(level).collect())
            }
        }
    }
}
