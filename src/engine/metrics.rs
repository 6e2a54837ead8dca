//! Label evaluation timings.
//!
//! Collected by [`crate::api::evaluate_label`] for each phase and surfaced in
//! the report and the debug output. Timings are observational only; nothing
//! in a report depends on them.

use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, Serialize)]
pub struct RunMetrics {
    /// Total elapsed time for one label.
    pub total: Duration,
    /// Answering the compiled questions.
    pub questions: PhaseMetrics,
    /// Allergen and gluten detection.
    pub allergens: PhaseMetrics,
    pub sweeteners: PhaseMetrics,
    pub supplements: PhaseMetrics,
    /// Net quantity checklist.
    pub net_quantity: PhaseMetrics,
    /// Nutrition facts audit.
    pub nutrition: PhaseMetrics,
}

/// Timing and output size for a single phase.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct PhaseMetrics {
    pub duration: Duration,
    /// Number of records the phase produced.
    pub produced: usize,
}

impl PhaseMetrics {
    /// Run `f`, recording its duration and `count` of its output.
    pub fn measure<T>(f: impl FnOnce() -> T, count: impl FnOnce(&T) -> usize) -> (T, PhaseMetrics) {
        let start = Instant::now();
        let out = f();
        let duration = start.elapsed();
        let produced = count(&out);
        (out, PhaseMetrics { duration, produced })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_output_size() {
        let (out, metrics) = PhaseMetrics::measure(|| vec![1, 2, 3], Vec::len);
        assert_eq!(out, vec![1, 2, 3]);
        assert_eq!(metrics.produced, 3);
    }
}
