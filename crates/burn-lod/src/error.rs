/// Errors raised by LoD tensor operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required input is missing or malformed.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: String,
    },

    /// A tensor does not have the shape its offsets imply.
    #[error("Shape mismatch: {reason}")]
    ShapeMismatch {
        /// The expected and actual shapes.
        reason: String,
    },

    /// Reading or writing a configuration failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration could not be encoded or decoded.
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn shape_mismatch(reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            reason: reason.into(),
        }
    }
}

/// Result type of LoD tensor operations.
pub type Result<T> = core::result::Result<T, Error>;
