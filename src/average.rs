//! Subject-level ERP averaging.
//!
//! Reduction order is trial → block.  The noise statistic depends on which
//! axes are averaged (see [`AveragingMode`]):
//!
//! ```text
//! Trial  [T, trials]          mean, population std   (ddof = 0)
//! Block  [T, blocks]          mean, population std   (ddof = 0)
//! Full   [T, trials × blocks] mean, standard error   (ddof = 1, / √n)
//! ```
//!
//! NaN samples are dropped from each reduction; a time point with nothing
//! left is NaN in both values and noise.
use ndarray::{s, Array2, Axis};

use crate::dataset::RawDataset;
use crate::error::{ErpError, Result};
use crate::extract::extract;
use crate::selection::{request_label, AveragingMode, Selection, TensorAxis};
use crate::signal::Signal;
use crate::stats;

/// Average one subject over a trial range, a block range, or both.
///
/// `trials`/`blocks` are 1-based; ranges are inclusive.  Two single indices
/// are rejected with [`ErpError::DegenerateAverage`]; use
/// [`extract`](crate::extract::extract) for that.
pub fn subject_average(
    dataset: &RawDataset,
    subject: &str,
    trials: impl Into<Selection>,
    blocks: impl Into<Selection>,
) -> Result<Signal> {
    let (trials, blocks) = (trials.into(), blocks.into());
    let mode = AveragingMode::of(trials, blocks);
    let si = dataset.subject_index(subject)?;
    let tr = trials.resolve(dataset.n_trials(), TensorAxis::Trial)?;
    let br = blocks.resolve(dataset.n_blocks(), TensorAxis::Block)?;
    log::debug!("subject_average {subject} trials={trials} blocks={blocks} mode={mode:?}");

    // [T, trials, blocks]
    let cube = dataset
        .subject_view(si)
        .slice_move(s![.., tr.as_range(), br.as_range()]);

    let (values, noise) = match mode {
        AveragingMode::SingleCell => {
            return Err(ErpError::DegenerateAverage {
                trial: trials.start(),
                block: blocks.start(),
            })
        }
        AveragingMode::Trial => {
            let lanes = cube.index_axis(Axis(2), 0);
            (stats::nanmean_lanes(&lanes), stats::nanstd_lanes(&lanes, 0))
        }
        AveragingMode::Block => {
            let lanes = cube.index_axis(Axis(1), 0);
            (stats::nanmean_lanes(&lanes), stats::nanstd_lanes(&lanes, 0))
        }
        AveragingMode::Full => {
            let n_t = cube.dim().0;
            let pooled = Array2::from_shape_vec(
                (n_t, tr.len() * br.len()),
                cube.iter().copied().collect(),
            )
            .map_err(|e| ErpError::Shape(e.to_string()))?;
            let pooled = pooled.view();
            (stats::nanmean_lanes(&pooled), stats::nansem_lanes(&pooled))
        }
    };

    Ok(Signal::with_noise(values, dataset.timeline().clone(), noise)?
        .with_group(dataset.groups()[si].clone())
        .with_label(request_label(subject, trials, blocks)))
}

/// Subject signal for any request shape: a single cell goes through
/// [`extract`], everything else through [`subject_average`].
pub fn subject_signal(
    dataset: &RawDataset,
    subject: &str,
    trials: impl Into<Selection>,
    blocks: impl Into<Selection>,
) -> Result<Signal> {
    match (trials.into(), blocks.into()) {
        (Selection::Single(t), Selection::Single(b)) => extract(dataset, subject, t, b),
        (t, b) => subject_average(dataset, subject, t, b),
    }
}
