//! ERP components: polarity-tagged time windows over a [`Signal`].
//!
//! A [`Component`] borrows the windowed slice of one signal.  All statistics
//! are computed on `effective = values - baseline`, skip NaN samples, and
//! return NaN when the window holds no usable sample.
use std::fmt;
use std::str::FromStr;

use ndarray::{s, Array1, ArrayView1};

use crate::error::{ErpError, Result};
use crate::signal::Signal;
use crate::stats;
use crate::timeline::window_indices;

/// Expected sign of a component's deflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Negative,
    Positive,
}

impl Orientation {
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Self::Negative),
            'P' => Some(Self::Positive),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Negative => 'N',
            Self::Positive => 'P',
        }
    }
}

#[derive(Debug, Clone)]
pub struct Component<'a> {
    orientation: Orientation,
    window_start: f64,
    window_end: f64,
    baseline: f64,
    timeline: ArrayView1<'a, f64>,
    values: ArrayView1<'a, f64>,
}

impl<'a> Component<'a> {
    /// Window `signal` to `[window_start, window_end]` (timeline units).
    ///
    /// Bounds snap to the nearest samples; the realised window is the
    /// half-open index range between them and may be empty.  An end at or
    /// past the last sample keeps the last sample.
    pub fn new(
        orientation: Orientation,
        window_start: f64,
        window_end: f64,
        signal: &'a Signal,
        baseline: f64,
    ) -> Result<Self> {
        if window_start.is_nan() || window_end.is_nan() || window_start >= window_end {
            return Err(ErpError::Window { start: window_start, end: window_end });
        }
        let full_timeline = signal.timeline();
        let (i1, i2) = window_indices(&full_timeline, window_start, window_end);
        Ok(Self {
            orientation,
            window_start,
            window_end,
            baseline,
            timeline: full_timeline.slice_move(s![i1..i2]),
            values: signal.values().slice_move(s![i1..i2]),
        })
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Requested `(start, end)`, before snapping to samples.
    pub fn window(&self) -> (f64, f64) {
        (self.window_start, self.window_end)
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Sliced timeline actually covered.
    pub fn timeline(&self) -> ArrayView1<'a, f64> {
        self.timeline
    }

    /// Sliced raw values (baseline not subtracted).
    pub fn values(&self) -> ArrayView1<'a, f64> {
        self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `values - baseline` over the window.
    pub fn effective(&self) -> Array1<f64> {
        self.values.mapv(|v| v - self.baseline)
    }

    pub fn sum(&self) -> f64 {
        stats::nansum(&self.effective().view())
    }

    pub fn absolute_sum(&self) -> f64 {
        stats::nansum(&self.effective().mapv(f64::abs).view())
    }

    /// Legacy RMS: `sqrt(mean(effective))`.
    ///
    /// Not a root-mean-square; NaN whenever the mean is negative.  Kept for
    /// consumers that depend on historical values, see [`Self::true_rms`].
    pub fn rms(&self) -> f64 {
        stats::nanmean(&self.effective().view()).sqrt()
    }

    /// Root-mean-square: `sqrt(mean(effective²))`.
    pub fn true_rms(&self) -> f64 {
        stats::nanmean(&self.effective().mapv(|v| v * v).view()).sqrt()
    }

    /// Signed extremum: minimum for negative components, maximum for positive.
    pub fn peak(&self) -> f64 {
        let eff = self.effective();
        match self.orientation {
            Orientation::Negative => stats::nanmin(&eff.view()),
            Orientation::Positive => stats::nanmax(&eff.view()),
        }
    }

    /// Trapezoidal integral against the sliced timeline.
    pub fn area_under_curve(&self, use_absolute: bool) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        let mut eff = self.effective();
        if use_absolute {
            eff.mapv_inplace(f64::abs);
        }
        stats::nantrapz(&eff.view(), &self.timeline)
    }

    pub fn stats(&self) -> ComponentStats {
        ComponentStats {
            sum: self.sum(),
            absolute_sum: self.absolute_sum(),
            rms: self.rms(),
            true_rms: self.true_rms(),
            peak: self.peak(),
            area: self.area_under_curve(false),
            absolute_area: self.area_under_curve(true),
        }
    }
}

/// Every statistic of one component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentStats {
    pub sum: f64,
    pub absolute_sum: f64,
    /// Legacy `sqrt(mean(x))`.
    pub rms: f64,
    pub true_rms: f64,
    pub peak: f64,
    pub area: f64,
    pub absolute_area: f64,
}

/// A named component such as `N100`: polarity letter + latency (ms after
/// stimulus onset).
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpec {
    pub orientation: Orientation,
    pub latency: f64,
}

impl ComponentSpec {
    pub fn new(orientation: Orientation, latency: f64) -> Self {
        Self { orientation, latency }
    }

    /// `[latency + stimulus - half_width, latency + stimulus + half_width]`.
    pub fn window(&self, stimulus_time: f64, half_width: f64) -> (f64, f64) {
        let centre = stimulus_time + self.latency;
        (centre - half_width, centre + half_width)
    }

    /// Build the component over `signal`.
    pub fn apply<'a>(
        &self,
        signal: &'a Signal,
        stimulus_time: f64,
        half_width: f64,
        baseline: f64,
    ) -> Result<Component<'a>> {
        let (start, end) = self.window(stimulus_time, half_width);
        Component::new(self.orientation, start, end, signal, baseline)
    }
}

impl FromStr for ComponentSpec {
    type Err = ErpError;

    fn from_str(name: &str) -> Result<Self> {
        let name = name.trim();
        let mut chars = name.chars();
        let orientation = chars
            .next()
            .and_then(Orientation::from_letter)
            .ok_or_else(|| ErpError::ComponentName(name.to_string()))?;
        let latency: f64 = chars
            .as_str()
            .parse()
            .map_err(|_| ErpError::ComponentName(name.to_string()))?;
        if !latency.is_finite() {
            return Err(ErpError::ComponentName(name.to_string()));
        }
        Ok(Self { orientation, latency })
    }
}

impl fmt::Display for ComponentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.orientation.letter(), self.latency)
    }
}
