//! Single-trial extraction.
//!
//! `values[subject, :, trial - 1, block - 1]`, copied out of the tensor and
//! paired with the full timeline.  No averaging, no noise.
use ndarray::s;

use crate::dataset::RawDataset;
use crate::error::Result;
use crate::selection::{request_label, to_zero_based, TensorAxis};
use crate::signal::Signal;

/// Extract one subject/trial/block cell.  `trial` and `block` are 1-based.
pub fn extract(dataset: &RawDataset, subject: &str, trial: usize, block: usize) -> Result<Signal> {
    let si = dataset.subject_index(subject)?;
    let t0 = to_zero_based(trial, dataset.n_trials(), TensorAxis::Trial)?;
    let b0 = to_zero_based(block, dataset.n_blocks(), TensorAxis::Block)?;

    let values = dataset.values().slice(s![si, .., t0, b0]).to_owned();
    log::debug!("extract {subject} trial={trial} block={block}");

    Ok(Signal::new(values, dataset.timeline().clone())?
        .with_group(dataset.groups()[si].clone())
        .with_label(request_label(subject, trial.into(), block.into())))
}
