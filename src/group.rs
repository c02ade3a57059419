//! Group-level averaging across subjects.
//!
//! Each subject of the group is built independently (in parallel), then the
//! subject traces are reduced per time point.  Two noise policies apply:
//!
//! * single trial + single block ([`GroupNoise::SubjectStdErr`]): standard
//!   error of the subject values, i.e. between-subject variability;
//! * any averaging request ([`GroupNoise::MeanSubjectNoise`]): mean of the
//!   subjects' own noise traces.
use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::average::subject_signal;
use crate::dataset::RawDataset;
use crate::error::{ErpError, Result};
use crate::selection::{request_label, Selection};
use crate::signal::Signal;
use crate::stats;

/// How the group noise trace is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupNoise {
    /// Standard error of the subject values (ddof = 1, / √n).
    SubjectStdErr,
    /// NaN-mean of the per-subject noise traces.
    MeanSubjectNoise,
}

impl GroupNoise {
    pub fn of(trials: Selection, blocks: Selection) -> Self {
        if trials.is_single() && blocks.is_single() {
            Self::SubjectStdErr
        } else {
            Self::MeanSubjectNoise
        }
    }
}

/// Average every subject of `group` over the same trial/block request.
///
/// Fails with [`ErpError::GroupNotFound`] when no subject has that label, or
/// with the first per-subject error encountered.
pub fn group_average(
    dataset: &RawDataset,
    group: &str,
    trials: impl Into<Selection>,
    blocks: impl Into<Selection>,
) -> Result<Signal> {
    let (trials, blocks) = (trials.into(), blocks.into());
    let members = dataset.subjects_in(group);
    if members.is_empty() {
        return Err(ErpError::GroupNotFound { group: group.to_string() });
    }
    let policy = GroupNoise::of(trials, blocks);
    log::debug!(
        "group_average {group}: {} subjects trials={trials} blocks={blocks} noise={policy:?}",
        members.len()
    );

    let signals: Vec<Signal> = members
        .par_iter()
        .map(|s| subject_signal(dataset, s, trials, blocks))
        .collect::<Result<_>>()?;

    for sig in signals.iter().filter(|s| s.is_null()) {
        log::warn!(
            "{}: no usable samples, contributes nothing to group '{group}'",
            sig.label().unwrap_or("?")
        );
    }

    let n_t = dataset.n_times();
    let values = stack_columns(signals.iter().map(|s| s.values().to_owned()), n_t);
    let values_view = values.view();
    let mean = stats::nanmean_lanes(&values_view);

    let noise = match policy {
        GroupNoise::SubjectStdErr => stats::nansem_lanes(&values_view),
        GroupNoise::MeanSubjectNoise => {
            let noise = stack_columns(signals.iter().map(Signal::noise_or_nan), n_t);
            stats::nanmean_lanes(&noise.view())
        }
    };

    Ok(Signal::with_noise(mean, dataset.timeline().clone(), noise)?
        .with_group(group)
        .with_label(request_label(group, trials, blocks)))
}

/// Stack per-subject traces as columns: `[T, S]`.
fn stack_columns<I>(columns: I, n_t: usize) -> Array2<f64>
where
    I: ExactSizeIterator<Item = Array1<f64>>,
{
    let mut out = Array2::from_elem((n_t, columns.len()), f64::NAN);
    for (j, col) in columns.enumerate() {
        out.column_mut(j).assign(&col);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array4};

    /// Three "Control" subjects with constant value `s + 1`, one "ASD".
    fn ds() -> RawDataset {
        let values = Array4::from_shape_fn((4, 3, 2, 2), |(s, _, tr, b)| {
            (s + 1) as f64 + 0.5 * tr as f64 + 0.25 * b as f64
        });
        RawDataset::new(
            values,
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            vec!["Control".into(), "Control".into(), "Control".into(), "ASD".into()],
            Array1::linspace(0.0, 2.0, 3),
        )
        .unwrap()
    }

    #[test]
    fn single_cell_noise_is_between_subject_sem() {
        let sig = group_average(&ds(), "Control", 1, 1).unwrap();
        assert_abs_diff_eq!(sig.values()[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sig.noise().unwrap()[0], 1.0 / 3.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(sig.group(), Some("Control"));
    }

    #[test]
    fn averaged_noise_is_mean_of_subject_noise() {
        // trials 1-2 at block 1: each subject [x, x + 0.5], population std 0.25
        let sig = group_average(&ds(), "Control", (1, 2), 1).unwrap();
        assert_abs_diff_eq!(sig.values()[1], 2.25, epsilon = 1e-12);
        assert_abs_diff_eq!(sig.noise().unwrap()[1], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn unknown_group() {
        let err = group_average(&ds(), "Nobody", 1, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn subject_errors_propagate() {
        let err = group_average(&ds(), "ASD", (1, 9), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn policy_from_shapes() {
        assert_eq!(GroupNoise::of(1.into(), 1.into()), GroupNoise::SubjectStdErr);
        assert_eq!(GroupNoise::of((1, 2).into(), 1.into()), GroupNoise::MeanSubjectNoise);
    }
}
