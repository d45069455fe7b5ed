//! End-to-end run: load → group → interpolate → write
//!
//! All configuration is passed in; nothing here keeps process-wide state.

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::grouping::group_by_timestamp;
use crate::interpolation::{do_concurrent, interpolate_area, AreaInterpolation};
use crate::loader::load_store;
use crate::record::ReadingStore;
use crate::region::Region;
use crate::writer::{GridWriter, OutputFormat, WriteSummary};
use log::info;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub region: Region,
    pub monitors: PathBuf,
    pub readings: PathBuf,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Keep only readings of this chemical
    pub chemical: Option<String>,
    /// Process time slices on the Rayon pool instead of the calling thread
    pub concurrent: bool,
}

#[derive(Debug)]
pub struct RunReport {
    pub interpolation: AreaInterpolation,
    pub written: WriteSummary,
}

impl RunReport {
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.interpolation.diagnostics
    }
}

/// Group the store's readings and interpolate every time slice
///
/// Grouping diagnostics come first in the returned [`Diagnostics`], followed
/// by per-slice ones in timestamp order.
pub fn interpolate_store(
    store: &ReadingStore,
    region: &Region,
    concurrent: bool,
) -> AreaInterpolation {
    let mut diagnostics = Diagnostics::new();
    let slices = group_by_timestamp(store.monitors(), store.readings(), &mut diagnostics);

    let mut result = if concurrent {
        do_concurrent(region, &slices)
    } else {
        interpolate_area(region, &slices)
    };

    diagnostics.merge(std::mem::take(&mut result.diagnostics));
    result.diagnostics = diagnostics;
    result
}

/// Execute a full run
///
/// Fatal failures (unreadable or malformed input, unparseable timestamps,
/// output collisions, I/O) are returned as errors. Everything non-fatal is
/// in the report's diagnostics.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    let mut store = load_store(&config.monitors, &config.readings)?;
    if let Some(chemical) = &config.chemical {
        store.retain_chemical(chemical);
        info!("Kept {} readings of {}", store.readings().len(), chemical);
    }

    let (start, end) = (config.region.start(), config.region.end());
    info!(
        "Interpolating over x {}..{}, y {}..{} ({} sites per timestamp)",
        start.x,
        end.x,
        start.y,
        end.y,
        config.region.site_count()
    );

    let interpolation = interpolate_store(&store, &config.region, config.concurrent);
    let written = GridWriter::new(&config.output_dir, config.format)
        .write_all(&interpolation.grids)?;

    Ok(RunReport {
        interpolation,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::record::{ChemReading, Monitor};

    #[test]
    fn test_interpolate_store_merges_grouping_diagnostics() {
        let store = ReadingStore::new(
            vec![
                Monitor::new("A", 0.0, 0.0),
                Monitor::new("B", 10.0, 0.0),
                Monitor::new("C", 0.0, 10.0),
                Monitor::new("D", 10.0, 10.0),
            ],
            vec![
                ChemReading::new("X", "A", "t", 5.0),
                ChemReading::new("X", "B", "t", 15.0),
                ChemReading::new("X", "C", "t", 15.0),
                ChemReading::new("X", "D", "t", 25.0),
                ChemReading::new("X", "Z", "t", 1.0),
            ],
        );
        let region = Region::new(Point::new(2, 2), Point::new(4, 4)).unwrap();

        let result = interpolate_store(&store, &region, false);

        assert_eq!(result.grids["t"].len(), 4);
        assert_eq!(result.diagnostics.lookup_failures.len(), 1);
        assert!(result.diagnostics.slice_failures.is_empty());
    }
}
