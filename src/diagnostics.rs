//! Aggregated non-fatal failures of a run
//!
//! Nothing here stops processing. Each entry is logged at `warn` when it is
//! recorded and the whole set is summarized once the run finishes.

use crate::error::InterpolationError;
use log::warn;

/// Why a time slice produced no grid
#[derive(Debug)]
pub enum SliceFailure {
    /// Fewer distinct sample positions than a triangulation needs
    InsufficientPoints { distinct: usize, required: usize },
    /// Triangulation failed on the sample positions
    Geometry(InterpolationError),
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Readings dropped because their monitor id is unknown
    pub lookup_failures: Vec<InterpolationError>,
    /// Monitor ids seen more than once; the first row for each id is kept
    pub duplicate_monitor_ids: Vec<String>,
    /// Samples dropped because an earlier sample in the slice sat at the same position
    pub duplicate_samples: usize,
    /// Slices that yielded an empty grid, keyed by timestamp
    pub slice_failures: Vec<(String, SliceFailure)>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup_failure(&mut self, monitor_id: &str, timestamp: &str) {
        warn!(
            "Dropping reading at {}: unknown monitor '{}'",
            timestamp, monitor_id
        );
        self.lookup_failures.push(InterpolationError::Lookup {
            monitor_id: monitor_id.to_string(),
            timestamp: timestamp.to_string(),
        });
    }

    pub fn record_duplicate_monitor(&mut self, id: &str) {
        warn!("Duplicate monitor id '{}': keeping the first row", id);
        self.duplicate_monitor_ids.push(id.to_string());
    }

    pub fn record_slice_failure(&mut self, timestamp: &str, failure: SliceFailure) {
        match &failure {
            SliceFailure::InsufficientPoints { distinct, required } => warn!(
                "Slice {}: {} distinct sample positions, need at least {}; emitting empty grid",
                timestamp, distinct, required
            ),
            SliceFailure::Geometry(err) => {
                warn!("Slice {}: {}; emitting empty grid", timestamp, err)
            }
        }
        self.slice_failures.push((timestamp.to_string(), failure));
    }

    /// Fold another set of diagnostics into this one
    pub fn merge(&mut self, other: Diagnostics) {
        self.lookup_failures.extend(other.lookup_failures);
        self.duplicate_monitor_ids.extend(other.duplicate_monitor_ids);
        self.duplicate_samples += other.duplicate_samples;
        self.slice_failures.extend(other.slice_failures);
    }

    pub fn is_clean(&self) -> bool {
        self.lookup_failures.is_empty()
            && self.duplicate_monitor_ids.is_empty()
            && self.duplicate_samples == 0
            && self.slice_failures.is_empty()
    }

    /// One warning line per category that has entries
    pub fn warnings(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.lookup_failures.is_empty() {
            lines.push(format!(
                "{} reading(s) dropped: unknown monitor id",
                self.lookup_failures.len()
            ));
        }
        if !self.duplicate_monitor_ids.is_empty() {
            lines.push(format!(
                "{} duplicate monitor id(s) ignored: {}",
                self.duplicate_monitor_ids.len(),
                self.duplicate_monitor_ids.join(", ")
            ));
        }
        if self.duplicate_samples > 0 {
            lines.push(format!(
                "{} sample(s) dropped: position already sampled in the same slice",
                self.duplicate_samples
            ));
        }
        if !self.slice_failures.is_empty() {
            let timestamps: Vec<&str> = self
                .slice_failures
                .iter()
                .map(|(timestamp, _)| timestamp.as_str())
                .collect();
            lines.push(format!(
                "{} time slice(s) produced no grid: {}",
                self.slice_failures.len(),
                timestamps.join(", ")
            ));
        }
        lines
    }
}
