//! # erpkit — ERP averaging and component statistics
//!
//! `erpkit` turns a `[subject, time, trial, block]` EEG tensor into
//! event-related potentials and measures time-windowed components
//! (N100, P200, ...) on them.
//!
//! ## Pipeline overview
//!
//! ```text
//! RawDataset [S, T, TR, B]
//!   │
//!   ├─ extract()          one subject / trial / block, no noise
//!   ├─ subject_average()  trial, block or full averaging + std / std. error
//!   └─ group_average()    every subject of a group (parallel) → mean
//!        │
//!        └─→ Signal ── Component (window, polarity, baseline)
//!                         └─→ sum · |sum| · rms · peak · area
//! ```
//!
//! Trial and block numbers are **1-based** everywhere in the public API.
//! Missing samples are NaN and are skipped by every reduction.
//!
//! ## Quick start
//!
//! ```
//! use erpkit::{group_average, Component, Orientation, RawDataset};
//! use ndarray::{Array1, Array4};
//!
//! // 2 subjects × 5 samples × 10 trials × 4 blocks
//! let ds = RawDataset::new(
//!     Array4::from_elem((2, 5, 10, 4), 1.0),
//!     vec!["S01".into(), "S02".into()],
//!     vec!["Control".into(), "Control".into()],
//!     Array1::linspace(-100.0, 300.0, 5),
//! ).unwrap();
//!
//! // Average trials 1–10 of block 2 for every Control subject.
//! let erp = group_average(&ds, "Control", (1, 10), 2).unwrap();
//!
//! // N100 window, 50–150 ms.
//! let n100 = Component::new(Orientation::Negative, 50.0, 150.0, &erp, 0.0).unwrap();
//! assert_eq!(n100.peak(), 1.0);
//! ```

pub mod average;
pub mod component;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod group;
pub mod io;
pub mod selection;
pub mod signal;
pub mod stats;
pub mod timeline;

// ── Crate-root re-exports ─────────────────────────────────────────────────

pub use average::{subject_average, subject_signal};
pub use component::{Component, ComponentSpec, ComponentStats, Orientation};
pub use config::AnalysisConfig;
pub use dataset::RawDataset;
pub use error::{ErpError, ErrorKind, Result};
pub use extract::extract;
pub use group::{group_average, GroupNoise};
pub use io::{write_dataset, SignalWriter};
pub use selection::{request_label, to_zero_based, AveragingMode, AxisRange, Selection, TensorAxis};
pub use signal::Signal;
pub use timeline::{nearest_index, window_indices};

/// Who a report is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Subject(String),
    Group(String),
}

/// One measured component after one stimulus.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRow {
    pub component: ComponentSpec,
    pub stimulus_time: f64,
    /// Requested `(start, end)` window.
    pub window: (f64, f64),
    pub stats: ComponentStats,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub signal: Signal,
    pub rows: Vec<ComponentRow>,
}

/// Build the signal for `target` and measure every configured component
/// after every configured stimulus.
///
/// Subjects go through [`subject_signal`] (single cell or average, by request
/// shape), groups through [`group_average`].
///
/// # Errors
///
/// Any lookup, range or contract error from the builders, or an unparsable
/// component name in `cfg`.
pub fn component_report(
    dataset: &RawDataset,
    target: &Target,
    trials: Selection,
    blocks: Selection,
    cfg: &AnalysisConfig,
) -> Result<Report> {
    let specs = cfg.component_specs()?;
    let signal = match target {
        Target::Subject(id) => subject_signal(dataset, id, trials, blocks)?,
        Target::Group(label) => group_average(dataset, label, trials, blocks)?,
    };

    let mut rows = Vec::with_capacity(specs.len() * cfg.stimulus_times.len());
    for &stimulus_time in &cfg.stimulus_times {
        for spec in &specs {
            let window = cfg.component_window(spec, stimulus_time);
            let comp = Component::new(spec.orientation, window.0, window.1, &signal, cfg.baseline)?;
            rows.push(ComponentRow {
                component: spec.clone(),
                stimulus_time,
                window,
                stats: comp.stats(),
            });
        }
    }
    Ok(Report { signal, rows })
}
