//! The [`Signal`] value type.
//!
//! One trace over a timeline, with an optional per-sample noise estimate
//! (standard deviation or standard error, depending on how it was built)
//! and presentation metadata.  Signals are never modified after
//! construction; derived signals are new values.
use ndarray::{Array1, ArrayView1};

use crate::error::{ErpError, Result};
use crate::timeline;

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    values: Array1<f64>,
    timeline: Array1<f64>,
    noise: Option<Array1<f64>>,
    group: Option<String>,
    label: Option<String>,
}

impl Signal {
    /// Signal without a noise estimate.
    pub fn new(values: Array1<f64>, timeline: Array1<f64>) -> Result<Self> {
        Self::build(values, timeline, None)
    }

    /// Signal with a per-sample noise trace of the same length.
    pub fn with_noise(
        values: Array1<f64>,
        timeline: Array1<f64>,
        noise: Array1<f64>,
    ) -> Result<Self> {
        Self::build(values, timeline, Some(noise))
    }

    fn build(
        values: Array1<f64>,
        timeline: Array1<f64>,
        noise: Option<Array1<f64>>,
    ) -> Result<Self> {
        if values.len() != timeline.len() {
            return Err(ErpError::Shape(format!(
                "signal has {} values for {} timeline points",
                values.len(), timeline.len()
            )));
        }
        if let Some(n) = &noise {
            if n.len() != values.len() {
                return Err(ErpError::Shape(format!(
                    "noise has {} points for {} values", n.len(), values.len()
                )));
            }
        }
        timeline::validate(&timeline.view())?;
        Ok(Self { values, timeline, noise, group: None, label: None })
    }

    pub fn with_group(self, group: impl Into<String>) -> Self {
        Self { group: Some(group.into()), ..self }
    }

    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self { label: Some(label.into()), ..self }
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn timeline(&self) -> ArrayView1<'_, f64> {
        self.timeline.view()
    }

    pub fn noise(&self) -> Option<ArrayView1<'_, f64>> {
        self.noise.as_ref().map(|n| n.view())
    }

    /// Noise trace, or all-NaN when the signal carries none.
    pub fn noise_or_nan(&self) -> Array1<f64> {
        match &self.noise {
            Some(n) => n.clone(),
            None => Array1::from_elem(self.values.len(), f64::NAN),
        }
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when no sample carries data (every value is NaN).
    pub fn is_null(&self) -> bool {
        self.values.iter().all(|v| v.is_nan())
    }

    /// Split into `(values, timeline, noise)`.
    pub fn into_parts(self) -> (Array1<f64>, Array1<f64>, Option<Array1<f64>>) {
        (self.values, self.timeline, self.noise)
    }
}
