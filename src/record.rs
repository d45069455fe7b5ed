//! Typed input records and the store that holds them
//!
//! Records are created once at load time and never mutated afterwards.

/// A fixed sensing station with a known planar location
#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl Monitor {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self { id: id.into(), x, y }
    }
}

/// A single chemical measurement at one monitor and one timestamp
///
/// `timestamp` is kept verbatim: grouping compares it by exact string
/// equality and only the grid writer parses it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChemReading {
    pub chemical: String,
    pub monitor_id: String,
    pub timestamp: String,
    pub value: f64,
}

impl ChemReading {
    pub fn new(
        chemical: impl Into<String>,
        monitor_id: impl Into<String>,
        timestamp: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            chemical: chemical.into(),
            monitor_id: monitor_id.into(),
            timestamp: timestamp.into(),
            value,
        }
    }
}

/// Loaded monitors and readings
#[derive(Debug, Clone, Default)]
pub struct ReadingStore {
    monitors: Vec<Monitor>,
    readings: Vec<ChemReading>,
}

impl ReadingStore {
    pub fn new(monitors: Vec<Monitor>, readings: Vec<ChemReading>) -> Self {
        Self { monitors, readings }
    }

    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn readings(&self) -> &[ChemReading] {
        &self.readings
    }

    /// Keep only readings of one chemical (case-insensitive)
    pub fn retain_chemical(&mut self, chemical: &str) {
        self.readings
            .retain(|reading| reading.chemical.eq_ignore_ascii_case(chemical));
    }
}
