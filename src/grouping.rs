//! Grouping Engine
//!
//! Joins each reading to its monitor's coordinates and partitions the
//! resulting samples by timestamp.

use crate::diagnostics::Diagnostics;
use crate::record::{ChemReading, Monitor};
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// A reading resolved against its monitor's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReading {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl RawReading {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }
}

/// Samples keyed by their verbatim timestamp string
///
/// Within one slice, samples keep the order of the readings they came from.
pub type TimeSlices = BTreeMap<String, Vec<RawReading>>;

/// Index monitors by id; the first row seen for an id wins
pub fn index_monitors<'a>(
    monitors: &'a [Monitor],
    diagnostics: &mut Diagnostics,
) -> HashMap<&'a str, &'a Monitor> {
    let mut by_id: HashMap<&str, &Monitor> = HashMap::with_capacity(monitors.len());
    for monitor in monitors {
        if by_id.contains_key(monitor.id.as_str()) {
            diagnostics.record_duplicate_monitor(&monitor.id);
        } else {
            by_id.insert(monitor.id.as_str(), monitor);
        }
    }
    by_id
}

/// Partition readings into time slices of resolved samples
///
/// Timestamps are compared verbatim, so `"1/1/16 0:00"` and `"01/01/16 00:00"`
/// land in different slices. A reading whose monitor id is unknown is
/// dropped and recorded in `diagnostics`; the remaining readings are still
/// grouped.
pub fn group_by_timestamp(
    monitors: &[Monitor],
    readings: &[ChemReading],
    diagnostics: &mut Diagnostics,
) -> TimeSlices {
    let by_id = index_monitors(monitors, diagnostics);
    let mut slices = TimeSlices::new();

    for reading in readings {
        match by_id.get(reading.monitor_id.as_str()) {
            Some(monitor) => slices
                .entry(reading.timestamp.clone())
                .or_default()
                .push(RawReading::new(monitor.x, monitor.y, reading.value)),
            None => diagnostics.record_lookup_failure(&reading.monitor_id, &reading.timestamp),
        }
    }

    debug!(
        "Grouped {} readings from {} monitors into {} time slices",
        readings.len(),
        by_id.len(),
        slices.len()
    );

    slices
}
