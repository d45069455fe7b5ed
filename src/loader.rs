//! CSV loading for monitors and readings
//!
//! Both sources carry a header row, which is skipped. Any row that does not
//! fit its record shape aborts the load with [`InterpolationError::InputFormat`]
//! naming the source and line.
//!
//! Expected columns:
//! - monitors: `id, x, y`
//! - readings: `chemical, monitor_id, timestamp, value`

use crate::error::{InterpolationError, Result};
use crate::record::{ChemReading, Monitor, ReadingStore};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const MONITOR_FIELDS: usize = 3;
const READING_FIELDS: usize = 4;

/// Load both CSV files into a [`ReadingStore`]
pub fn load_store(monitors_path: &Path, readings_path: &Path) -> Result<ReadingStore> {
    let monitors = load_monitors(monitors_path)?;
    let readings = load_readings(readings_path)?;
    info!(
        "Loaded {} monitors from {} and {} readings from {}",
        monitors.len(),
        monitors_path.display(),
        readings.len(),
        readings_path.display()
    );
    Ok(ReadingStore::new(monitors, readings))
}

pub fn load_monitors(path: &Path) -> Result<Vec<Monitor>> {
    read_monitors(open(path)?, &path.display().to_string())
}

pub fn load_readings(path: &Path) -> Result<Vec<ChemReading>> {
    read_readings(open(path)?, &path.display().to_string())
}

/// Parse monitor rows from any reader
pub fn read_monitors<R: Read>(reader: R, source_name: &str) -> Result<Vec<Monitor>> {
    read_rows(reader, source_name, MONITOR_FIELDS, |row| {
        Ok(Monitor::new(
            row.field(0),
            row.real(1, "x")?,
            row.real(2, "y")?,
        ))
    })
}

/// Parse reading rows from any reader
pub fn read_readings<R: Read>(reader: R, source_name: &str) -> Result<Vec<ChemReading>> {
    read_rows(reader, source_name, READING_FIELDS, |row| {
        Ok(ChemReading::new(
            row.field(0),
            row.field(1),
            row.field(2),
            row.real(3, "value")?,
        ))
    })
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| InterpolationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// One data row plus enough context to report where it came from
struct Row<'a> {
    record: &'a StringRecord,
    source_name: &'a str,
    line: u64,
}

impl Row<'_> {
    fn field(&self, idx: usize) -> &str {
        self.record.get(idx).unwrap_or_default()
    }

    fn real(&self, idx: usize, name: &str) -> Result<f64> {
        let raw = self.field(idx);
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_) => Err(self.error(format!("{} '{}' is not a finite number", name, raw))),
            Err(_) => Err(self.error(format!("{} '{}' is not a number", name, raw))),
        }
    }

    fn error(&self, message: String) -> InterpolationError {
        InterpolationError::InputFormat {
            source_name: self.source_name.to_string(),
            line: self.line,
            message,
        }
    }
}

fn read_rows<R, T, F>(reader: R, source_name: &str, fields: usize, parse: F) -> Result<Vec<T>>
where
    R: Read,
    F: Fn(&Row) -> Result<T>,
{
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|source| InterpolationError::Csv {
            source_name: source_name.to_string(),
            source,
        })?;
        let row = Row {
            record: &record,
            source_name,
            line: record.position().map_or(0, |pos| pos.line()),
        };

        if record.len() != fields {
            return Err(row.error(format!(
                "expected {} fields, found {}",
                fields,
                record.len()
            )));
        }

        records.push(parse(&row)?);
    }

    Ok(records)
}
