//! Error taxonomy for loading, grouping, interpolating and writing grids.
//!
//! Fatal errors (`InputFormat`, `Region`, I/O) abort a run. `Lookup` and
//! `Geometry` are non-fatal: they are collected in [`crate::Diagnostics`]
//! and the run carries on with the remaining readings and time slices.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, InterpolationError>;

#[derive(Debug, Error)]
pub enum InterpolationError {
    /// A CSV row could not be turned into a record
    #[error("{source_name}:{line}: {message}")]
    InputFormat {
        source_name: String,
        line: u64,
        message: String,
    },

    /// Start/end corners do not describe a non-empty rectangle
    #[error("invalid region: start ({x0}, {y0}) must be below end ({x1}, {y1}) on both axes")]
    Region { x0: i64, y0: i64, x1: i64, y1: i64 },

    /// A reading references a monitor id that was never loaded
    #[error("reading at {timestamp} references unknown monitor '{monitor_id}'")]
    Lookup {
        monitor_id: String,
        timestamp: String,
    },

    /// No triangulation exists for the given sample positions
    #[error("cannot triangulate sample positions: {reason}")]
    Geometry { reason: String },

    #[error("cannot parse timestamp '{raw}': {message}")]
    Timestamp { raw: String, message: String },

    /// Two time slices would be written to the same file
    #[error("time slices '{first}' and '{second}' both map to {path}")]
    OutputCollision {
        first: String,
        second: String,
        path: PathBuf,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("GeoJSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl InterpolationError {
    /// Whether this error should stop the whole run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Lookup { .. } | Self::Geometry { .. })
    }
}
