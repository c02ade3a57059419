//! Real-valued time → sample index mapping.
//!
//! Component windows are expressed in milliseconds relative to stimulus
//! onset; these helpers translate them into index bounds without assuming a
//! uniform sampling rate.  Queries outside the timeline clamp to its ends.
use ndarray::ArrayView1;

use crate::error::{ErpError, Result};

/// Index of the sample closest to `t`.  Ties resolve to the lowest index.
///
/// Targets at or beyond either end (including `±∞`) clamp to that end.
/// An empty timeline yields `0`.
pub fn nearest_index(timeline: &ArrayView1<f64>, t: f64) -> usize {
    let (Some(&first), Some(&last)) = (timeline.first(), timeline.last()) else {
        return 0;
    };
    if t <= first {
        return 0;
    }
    if t >= last {
        return timeline.len() - 1;
    }
    let mut best = 0;
    let mut best_dist = (first - t).abs();
    for (i, &v) in timeline.iter().enumerate().skip(1) {
        let d = (v - t).abs();
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

/// Half-open index bounds `[i1, i2)` for the window `[t1, t2]`.
///
/// When `t2` reaches the last sample (or lies past it) the window runs to
/// the end of the timeline, last sample included.  `i1 <= i2` always
/// holds; `i1 == i2` is an empty window.
pub fn window_indices(timeline: &ArrayView1<f64>, t1: f64, t2: f64) -> (usize, usize) {
    let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
    let i1 = nearest_index(timeline, lo);
    let i2 = match timeline.last() {
        Some(&last) if hi >= last => timeline.len(),
        _ => nearest_index(timeline, hi),
    };
    (i1, i2.max(i1))
}

/// Check that `timeline` is strictly increasing and free of NaN.
pub fn validate(timeline: &ArrayView1<f64>) -> Result<()> {
    if let Some(i) = timeline.iter().position(|v| v.is_nan()) {
        return Err(ErpError::Timeline(format!("NaN at sample {i}")));
    }
    for (i, w) in timeline.windows(2).into_iter().enumerate() {
        if w[1] <= w[0] {
            return Err(ErpError::Timeline(format!(
                "not strictly increasing at sample {}: {} -> {}",
                i + 1,
                w[0],
                w[1]
            )));
        }
    }
    Ok(())
}
