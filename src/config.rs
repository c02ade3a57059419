//! Analysis configuration.
//!
//! [`AnalysisConfig`] collects the knobs of a component report: which
//! components to measure, where the stimuli are, how wide each window is and
//! which baseline to subtract.

use crate::component::ComponentSpec;
use crate::error::Result;

/// Configuration for [`crate::component_report`].
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use erpkit::AnalysisConfig;
///
/// let cfg = AnalysisConfig {
///     stimulus_times: vec![0.0, 600.0],   // two stimuli per trial
///     component_half_width: 30.0,
///     ..AnalysisConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Stimulus onsets on the timeline (ms).  Every component is measured
    /// once per stimulus.
    ///
    /// Default: `[0.0]`.
    pub stimulus_times: Vec<f64>,

    /// Half-width of a component window (ms).  `N100` after a stimulus at
    /// 0 ms covers `[100 - w, 100 + w]`.
    ///
    /// Default: `50.0` ms.
    pub component_half_width: f64,

    /// Level subtracted from the signal before any statistic.
    ///
    /// Default: `0.0`.
    pub baseline: f64,

    /// Component names, polarity letter + latency in ms.
    ///
    /// Default: `["N100", "P200"]`.
    pub components: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stimulus_times: vec![0.0],
            component_half_width: 50.0,
            baseline: 0.0,
            components: vec!["N100".into(), "P200".into()],
        }
    }
}

impl AnalysisConfig {
    /// Parse [`Self::components`].
    ///
    /// ```
    /// use erpkit::AnalysisConfig;
    /// let specs = AnalysisConfig::default().component_specs().unwrap();
    /// assert_eq!(specs.len(), 2);
    /// ```
    pub fn component_specs(&self) -> Result<Vec<ComponentSpec>> {
        self.components.iter().map(|c| c.parse()).collect()
    }

    /// Window of `spec` after the stimulus at `stimulus_time`.
    pub fn component_window(&self, spec: &ComponentSpec, stimulus_time: f64) -> (f64, f64) {
        spec.window(stimulus_time, self.component_half_width)
    }
}
