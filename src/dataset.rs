//! The raw `[subject, time, trial, block]` dataset.
//!
//! A [`RawDataset`] is handed to every extractor and builder explicitly; the
//! crate keeps no process-wide dataset.  Construction validates the axis
//! invariants once so the builders can index without re-checking shapes.
use ndarray::{Array1, Array4, ArrayView3};

use crate::error::{ErpError, Result};
use crate::selection::TensorAxis;
use crate::timeline;

#[derive(Debug, Clone)]
pub struct RawDataset {
    values: Array4<f64>,
    subjects: Vec<String>,
    groups: Vec<String>,
    timeline: Array1<f64>,
}

impl RawDataset {
    /// Validate and assemble a dataset.
    ///
    /// * `values`   – `[S, T, TR, B]`, NaN marks missing samples.
    /// * `subjects` – `S` unique identifiers.
    /// * `groups`   – `S` group labels, `groups[i]` belongs to `subjects[i]`.
    /// * `timeline` – `T` strictly increasing time points (ms).
    pub fn new(
        values: Array4<f64>,
        subjects: Vec<String>,
        groups: Vec<String>,
        timeline: Array1<f64>,
    ) -> Result<Self> {
        let (n_s, n_t, _, _) = values.dim();
        if subjects.len() != n_s {
            return Err(ErpError::Shape(format!(
                "{} subject ids for a subject axis of {n_s}", subjects.len()
            )));
        }
        if groups.len() != n_s {
            return Err(ErpError::Shape(format!(
                "{} group labels for a subject axis of {n_s}", groups.len()
            )));
        }
        if timeline.len() != n_t {
            return Err(ErpError::Shape(format!(
                "timeline has {} points for a time axis of {n_t}", timeline.len()
            )));
        }
        for (i, s) in subjects.iter().enumerate() {
            if subjects[..i].contains(s) {
                return Err(ErpError::Shape(format!("duplicate subject id '{s}'")));
            }
        }
        timeline::validate(&timeline.view())?;
        Ok(Self { values, subjects, groups, timeline })
    }

    pub fn values(&self) -> &Array4<f64> {
        &self.values
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn timeline(&self) -> &Array1<f64> {
        &self.timeline
    }

    pub fn n_subjects(&self) -> usize {
        self.values.dim().0
    }

    pub fn n_times(&self) -> usize {
        self.values.dim().1
    }

    pub fn n_trials(&self) -> usize {
        self.values.dim().2
    }

    pub fn n_blocks(&self) -> usize {
        self.values.dim().3
    }

    /// Extent of `axis`.
    pub fn axis_len(&self, axis: TensorAxis) -> usize {
        self.values.shape()[axis.index()]
    }

    /// Row of `subject` on the subject axis.
    pub fn subject_index(&self, subject: &str) -> Result<usize> {
        self.subjects
            .iter()
            .position(|s| s == subject)
            .ok_or_else(|| ErpError::SubjectNotFound { subject: subject.to_string() })
    }

    pub fn group_of(&self, subject: &str) -> Result<&str> {
        let i = self.subject_index(subject)?;
        Ok(&self.groups[i])
    }

    /// Subject ids whose group equals `group`, in dataset order.
    pub fn subjects_in(&self, group: &str) -> Vec<&str> {
        self.subjects
            .iter()
            .zip(&self.groups)
            .filter(|(_, g)| *g == group)
            .map(|(s, _)| s.as_str())
            .collect()
    }

    /// Distinct group labels in first-seen order.
    pub fn group_labels(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for g in &self.groups {
            if !out.contains(&g.as_str()) {
                out.push(g);
            }
        }
        out
    }

    /// `[T, TR, B]` view of one subject.
    pub(crate) fn subject_view(&self, index: usize) -> ArrayView3<'_, f64> {
        self.values.index_axis(ndarray::Axis(0), index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn small() -> RawDataset {
        RawDataset::new(
            Array4::zeros((3, 4, 2, 2)),
            ids(&["S01", "S02", "S03"]),
            ids(&["Control", "ASD", "Control"]),
            Array1::linspace(0.0, 3.0, 4),
        )
        .unwrap()
    }

    #[test]
    fn lookups() {
        let ds = small();
        assert_eq!(ds.subject_index("S02").unwrap(), 1);
        assert_eq!(ds.group_of("S03").unwrap(), "Control");
        assert_eq!(ds.subjects_in("Control"), vec!["S01", "S03"]);
        assert_eq!(ds.group_labels(), vec!["Control", "ASD"]);
        assert!(ds.subjects_in("Nope").is_empty());
        assert!(ds.subject_index("S99").is_err());
    }

    #[test]
    fn axis_extents() {
        let ds = small();
        assert_eq!(ds.axis_len(TensorAxis::Subject), 3);
        assert_eq!(ds.axis_len(TensorAxis::Time), 4);
        assert_eq!(ds.n_trials(), 2);
        assert_eq!(ds.n_blocks(), 2);
    }

    #[test]
    fn rejects_inconsistent_axes() {
        let r = RawDataset::new(
            Array4::zeros((2, 4, 1, 1)),
            ids(&["S01"]),
            ids(&["A", "B"]),
            Array1::linspace(0.0, 3.0, 4),
        );
        assert!(r.is_err());

        let r = RawDataset::new(
            Array4::zeros((1, 4, 1, 1)),
            ids(&["S01"]),
            ids(&["A"]),
            Array1::linspace(0.0, 3.0, 5),
        );
        assert!(r.is_err());
    }

    #[test]
    fn rejects_duplicate_subjects() {
        let r = RawDataset::new(
            Array4::zeros((2, 2, 1, 1)),
            ids(&["S01", "S01"]),
            ids(&["A", "A"]),
            Array1::linspace(0.0, 1.0, 2),
        );
        assert!(r.is_err());
    }
}
