//! Error taxonomy.
//!
//! Structural problems with a request (unknown subject, index outside the
//! tensor, degenerate averaging request) are errors.  Missing samples (NaN)
//! are not: they flow through the nan-aware reductions in [`crate::stats`].
use thiserror::Error;

use crate::selection::TensorAxis;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ErpError>;

/// Coarse classification of an [`ErpError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A subject identifier or group label does not exist.
    Lookup,
    /// A trial/block index or range lies outside the tensor.
    Range,
    /// The request is well-formed but asks for something the operation does
    /// not do (e.g. averaging a single cell).
    Contract,
    /// Malformed input data (shapes, timelines, windows, names).
    Invalid,
    /// Reading or writing the exchange container failed.
    Io,
}

#[derive(Error, Debug)]
pub enum ErpError {
    #[error("subject '{subject}' not found in dataset")]
    SubjectNotFound { subject: String },

    #[error("group '{group}' matches no subjects")]
    GroupNotFound { group: String },

    #[error("{axis} index {index} out of range (valid: 1..={len})")]
    IndexOutOfRange { axis: TensorAxis, index: usize, len: usize },

    #[error("{axis} range {start}-{end} out of range (valid: 1..={len}, start <= end)")]
    RangeOutOfBounds { axis: TensorAxis, start: usize, end: usize, len: usize },

    #[error(
        "trial {trial} / block {block} selects a single cell, nothing to average; \
         use extract() for single-trial signals"
    )]
    DegenerateAverage { trial: usize, block: usize },

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("invalid timeline: {0}")]
    Timeline(String),

    #[error("invalid component window [{start}, {end}]: start must be < end")]
    Window { start: f64, end: f64 },

    #[error("invalid component name '{0}' (expected e.g. N100 or P200)")]
    ComponentName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed container: {0}")]
    Format(String),
}

impl ErpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SubjectNotFound { .. } | Self::GroupNotFound { .. } => ErrorKind::Lookup,
            Self::IndexOutOfRange { .. } | Self::RangeOutOfBounds { .. } => ErrorKind::Range,
            Self::DegenerateAverage { .. } => ErrorKind::Contract,
            Self::Shape(_)
            | Self::Timeline(_)
            | Self::Window { .. }
            | Self::ComponentName(_) => ErrorKind::Invalid,
            Self::Io(_) | Self::Format(_) => ErrorKind::Io,
        }
    }
}
