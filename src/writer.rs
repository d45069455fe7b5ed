//! Grid Writer
//!
//! Writes one file per time slice, named by the whole hours elapsed since
//! the earliest timestamp of the batch (`0.csv`, `3.csv`, ...). The earliest
//! timestamp is taken over every slice in the result, including slices that
//! produced no grid, so file names do not shift when the first slice fails.
//! Empty slices produce no file.

use crate::error::{InterpolationError, Result};
use crate::grid_cell::GridPoint;
use crate::interpolation::InterpolationResult;
use crate::timestamp::{hours_since, parse_timestamp};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoValue};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File format of the per-slice grids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `x,y,reading` table with a header row
    #[default]
    Csv,
    /// FeatureCollection of Point features carrying a `reading` property
    GeoJson,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::GeoJson => "geojson",
        }
    }
}

/// What a call to [`GridWriter::write_all`] did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub files: Vec<PathBuf>,
    pub skipped_empty: usize,
}

#[derive(Debug, Clone)]
pub struct GridWriter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl GridWriter {
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    /// Hour offset of every timestamp from the earliest one
    ///
    /// Any timestamp that does not parse is fatal.
    pub fn hour_offsets(grids: &InterpolationResult) -> Result<BTreeMap<&str, i64>> {
        let parsed = grids
            .keys()
            .map(|raw| parse_timestamp(raw).map(|time| (raw.as_str(), time)))
            .collect::<Result<Vec<_>>>()?;

        let Some(earliest) = parsed.iter().map(|(_, time)| *time).min() else {
            return Ok(BTreeMap::new());
        };

        Ok(parsed
            .into_iter()
            .map(|(raw, time)| (raw, hours_since(earliest, time)))
            .collect())
    }

    /// Output path for every non-empty slice
    ///
    /// Fails before anything is written when two slices would share a file.
    pub fn plan<'a>(&self, grids: &'a InterpolationResult) -> Result<Vec<(PathBuf, &'a str)>> {
        let offsets = Self::hour_offsets(grids)?;
        let mut owners: HashMap<PathBuf, &str> = HashMap::new();
        let mut plan = Vec::new();

        for (timestamp, points) in grids {
            if points.is_empty() {
                continue;
            }
            let hours = offsets[timestamp.as_str()];
            let path = self
                .output_dir
                .join(format!("{}.{}", hours, self.format.extension()));

            if let Some(first) = owners.insert(path.clone(), timestamp.as_str()) {
                return Err(InterpolationError::OutputCollision {
                    first: first.to_string(),
                    second: timestamp.clone(),
                    path,
                });
            }
            plan.push((path, timestamp.as_str()));
        }

        Ok(plan)
    }

    /// Write every non-empty slice, creating the output directory if needed
    pub fn write_all(&self, grids: &InterpolationResult) -> Result<WriteSummary> {
        let plan = self.plan(grids)?;

        fs::create_dir_all(&self.output_dir).map_err(|source| InterpolationError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut summary = WriteSummary {
            skipped_empty: grids.values().filter(|points| points.is_empty()).count(),
            ..WriteSummary::default()
        };

        for (path, timestamp) in plan {
            let points = &grids[timestamp];
            self.write_file(&path, points)?;
            debug!(
                "Wrote {} grid points for {} to {}",
                points.len(),
                timestamp,
                path.display()
            );
            summary.files.push(path);
        }

        info!(
            "Wrote {} grid files to {} ({} empty slices skipped)",
            summary.files.len(),
            self.output_dir.display(),
            summary.skipped_empty
        );

        Ok(summary)
    }

    fn write_file(&self, path: &Path, points: &[GridPoint]) -> Result<()> {
        let io_error = |source| InterpolationError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_error)?;
        let mut out = BufWriter::new(file);

        match self.format {
            OutputFormat::Csv => write_csv(&mut out, points, &path.display().to_string())?,
            OutputFormat::GeoJson => {
                serde_json::to_writer(&mut out, &to_feature_collection(points))?
            }
        }

        out.flush().map_err(io_error)
    }
}

/// Write `points` as an `x,y,reading` table
pub fn write_csv<W: Write>(writer: W, points: &[GridPoint], source_name: &str) -> Result<()> {
    let csv_error = |source| InterpolationError::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["x", "y", "reading"])
        .map_err(csv_error)?;
    for point in points {
        csv_writer
            .write_record([
                point.x.to_string(),
                point.y.to_string(),
                point.value.to_string(),
            ])
            .map_err(csv_error)?;
    }
    csv_writer.flush().map_err(|source| InterpolationError::Io {
        path: PathBuf::from(source_name),
        source,
    })
}

/// Helper to build a GeoJSON Point feature carrying a reading
fn create_point_feature(point: &GridPoint) -> Feature {
    let geometry = Geometry::new(GeoValue::Point(vec![point.x as f64, point.y as f64]));
    let mut properties = JsonObject::new();
    properties.insert("reading".to_string(), serde_json::json!(point.value));

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Grid points as a GeoJSON FeatureCollection, one Point feature per site
pub fn to_feature_collection(points: &[GridPoint]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        foreign_members: None,
        features: points.iter().map(create_point_feature).collect(),
    }
}
