//! NaN-aware reductions.
//!
//! Every reduction skips NaN samples.  A reduction that sees no finite
//! sample at all returns NaN instead of an identity value, so a fully
//! missing time point stays missing after averaging.
//!
//! The `*_lanes` helpers reduce a `[T, N]` view along its second axis,
//! producing one value per time point.
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

fn finite<'a>(x: &'a ArrayView1<'_, f64>) -> impl Iterator<Item = f64> + 'a {
    x.iter().copied().filter(|v| !v.is_nan())
}

/// Number of non-NaN samples.
pub fn count(x: &ArrayView1<f64>) -> usize {
    finite(x).count()
}

pub fn nansum(x: &ArrayView1<f64>) -> f64 {
    let mut n = 0usize;
    let mut acc = 0.0;
    for v in finite(x) {
        acc += v;
        n += 1;
    }
    if n == 0 { f64::NAN } else { acc }
}

pub fn nanmean(x: &ArrayView1<f64>) -> f64 {
    let n = count(x);
    if n == 0 {
        return f64::NAN;
    }
    finite(x).sum::<f64>() / n as f64
}

/// Standard deviation with `ddof` delta degrees of freedom.
///
/// `ddof = 0` is the population deviation, `ddof = 1` the sample deviation.
/// Returns NaN when `count <= ddof`.
pub fn nanstd(x: &ArrayView1<f64>, ddof: usize) -> f64 {
    let n = count(x);
    if n <= ddof {
        return f64::NAN;
    }
    let mean = nanmean(x);
    let ss = finite(x)
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>();
    (ss / (n - ddof) as f64).sqrt()
}

/// Standard error of the mean: sample deviation / sqrt(non-NaN count).
pub fn nansem(x: &ArrayView1<f64>) -> f64 {
    let n = count(x);
    nanstd(x, 1) / (n as f64).sqrt()
}

pub fn nanmin(x: &ArrayView1<f64>) -> f64 {
    finite(x).fold(f64::NAN, f64::min)
}

pub fn nanmax(x: &ArrayView1<f64>) -> f64 {
    finite(x).fold(f64::NAN, f64::max)
}

/// Trapezoidal integral of `y` against `x`, skipping samples where `y` is NaN.
///
/// Non-uniform spacing in `x` is honoured.  No finite sample → NaN,
/// exactly one → 0.
pub fn nantrapz(y: &ArrayView1<f64>, x: &ArrayView1<f64>) -> f64 {
    debug_assert_eq!(y.len(), x.len());
    let pts: Vec<(f64, f64)> = x
        .iter()
        .copied()
        .zip(y.iter().copied())
        .filter(|(_, v)| !v.is_nan())
        .collect();
    if pts.is_empty() {
        return f64::NAN;
    }
    pts.windows(2)
        .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) * 0.5)
        .sum()
}

/// Apply `f` to every row of a `[T, N]` view.
pub fn reduce_lanes<F>(data: &ArrayView2<f64>, f: F) -> Array1<f64>
where
    F: Fn(&ArrayView1<f64>) -> f64,
{
    data.axis_iter(Axis(0)).map(|row| f(&row)).collect()
}

pub fn nanmean_lanes(data: &ArrayView2<f64>) -> Array1<f64> {
    reduce_lanes(data, nanmean)
}

pub fn nanstd_lanes(data: &ArrayView2<f64>, ddof: usize) -> Array1<f64> {
    reduce_lanes(data, |row| nanstd(row, ddof))
}

pub fn nansem_lanes(data: &ArrayView2<f64>) -> Array1<f64> {
    reduce_lanes(data, nansem)
}
