//! Trial/block selections and the 1-based → 0-based boundary.
//!
//! Callers always speak in 1-based trial and block numbers.  The only place
//! that turns them into tensor offsets is [`to_zero_based`]; everything else
//! in the crate works with the resulting [`AxisRange`].
use std::fmt;
use std::ops::Range;

use crate::error::{ErpError, Result};

/// Axis of the raw `[subject, time, trial, block]` tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorAxis {
    Subject,
    Time,
    Trial,
    Block,
}

impl TensorAxis {
    /// Position of this axis in the raw tensor.
    pub fn index(self) -> usize {
        match self {
            Self::Subject => 0,
            Self::Time => 1,
            Self::Trial => 2,
            Self::Block => 3,
        }
    }
}

impl fmt::Display for TensorAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Subject => "subject",
            Self::Time => "time",
            Self::Trial => "trial",
            Self::Block => "block",
        })
    }
}

/// Convert a 1-based `index` on `axis` (extent `len`) to a 0-based offset.
///
/// `index` must lie in `1..=len`.
pub fn to_zero_based(index: usize, len: usize, axis: TensorAxis) -> Result<usize> {
    if index == 0 || index > len {
        return Err(ErpError::IndexOutOfRange { axis, index, len });
    }
    Ok(index - 1)
}

/// A 1-based trial or block request: one index, or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Single(usize),
    /// Inclusive on both ends.
    Range(usize, usize),
}

impl Selection {
    /// Build a selection from a start and an optional end.
    ///
    /// A missing end, or an end equal to the start, selects a single index.
    pub fn from_bounds(start: usize, end: Option<usize>) -> Self {
        match end {
            Some(e) if e != start => Self::Range(start, e),
            _ => Self::Single(start),
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// First selected index (1-based).
    pub fn start(&self) -> usize {
        match *self {
            Self::Single(i) | Self::Range(i, _) => i,
        }
    }

    /// Resolve against an axis of extent `len` into 0-based offsets.
    pub fn resolve(&self, len: usize, axis: TensorAxis) -> Result<AxisRange> {
        match *self {
            Self::Single(i) => {
                let i0 = to_zero_based(i, len, axis)?;
                Ok(AxisRange { start: i0, end: i0 + 1 })
            }
            Self::Range(start, end) => {
                if start == 0 || end > len || start > end {
                    return Err(ErpError::RangeOutOfBounds { axis, start, end, len });
                }
                let s0 = to_zero_based(start, len, axis)?;
                let e0 = to_zero_based(end, len, axis)?;
                Ok(AxisRange { start: s0, end: e0 + 1 })
            }
        }
    }
}

impl From<usize> for Selection {
    fn from(i: usize) -> Self {
        Self::Single(i)
    }
}

impl From<(usize, usize)> for Selection {
    fn from((start, end): (usize, usize)) -> Self {
        Self::Range(start, end)
    }
}

impl From<std::ops::RangeInclusive<usize>> for Selection {
    fn from(r: std::ops::RangeInclusive<usize>) -> Self {
        Self::Range(*r.start(), *r.end())
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(i) => write!(f, "{i}"),
            Self::Range(s, e) => write!(f, "{s}-{e}"),
        }
    }
}

/// Validated 0-based half-open offsets along one tensor axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub start: usize,
    pub end: usize,
}

impl AxisRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// How a subject-level signal is reduced, chosen from the request shape.
///
/// | mode         | values              | noise                                   |
/// |--------------|---------------------|-----------------------------------------|
/// | `SingleCell` | the cell itself     | none                                    |
/// | `Trial`      | mean over trials    | population std over trials              |
/// | `Block`      | mean over blocks    | population std over blocks              |
/// | `Full`       | mean over trial × block | sample std / sqrt(count) (std. error) |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AveragingMode {
    SingleCell,
    Trial,
    Block,
    Full,
}

impl AveragingMode {
    pub fn of(trials: Selection, blocks: Selection) -> Self {
        match (trials.is_single(), blocks.is_single()) {
            (true, true) => Self::SingleCell,
            (false, true) => Self::Trial,
            (true, false) => Self::Block,
            (false, false) => Self::Full,
        }
    }
}

/// Human-readable request label: `name|trials|blocks`, 1-based.
pub fn request_label(name: &str, trials: Selection, blocks: Selection) -> String {
    format!("{name}|{trials}|{blocks}")
}
