//! # geo-area-interpolation
//!
//! Turns sparse chemical readings taken at fixed monitoring stations into a
//! dense grid of estimated values over a rectangular area, one grid per
//! distinct timestamp.
//!
//! Each time slice is interpolated piecewise-linearly on the Delaunay
//! triangulation of its monitor positions and evaluated at every integer
//! site of the region. Sites outside the convex hull of the monitors have no
//! defined value and are left out of the output.
//!
//! ## Pipeline
//!
//! 1. **Reading Store**: [`Monitor`] and [`ChemReading`] records, loaded from
//!    CSV by the [`loader`] module
//! 2. **Grouping Engine**: [`group_by_timestamp`] joins readings to monitor
//!    positions and partitions them into [`TimeSlices`]
//! 3. **Interpolation Engine**: [`interpolate_area`] / [`do_concurrent`]
//!    produce an [`InterpolationResult`] of [`GridPoint`]s per timestamp
//! 4. **Grid Writer**: [`GridWriter`] writes one file per slice, named by
//!    hours elapsed since the earliest timestamp
//!
//! ## Examples
//!
//! ### Interpolating in memory
//!
//! ```
//! use geo_area_interpolation::{
//!     group_by_timestamp, interpolate_area, ChemReading, Diagnostics, Monitor, Point, Region,
//! };
//!
//! let monitors = vec![
//!     Monitor::new("A", 0.0, 0.0),
//!     Monitor::new("B", 10.0, 0.0),
//!     Monitor::new("C", 0.0, 10.0),
//!     Monitor::new("D", 10.0, 10.0),
//! ];
//! let readings = vec![
//!     ChemReading::new("AGOC-3A", "A", "01/01/20 00:00", 5.0),
//!     ChemReading::new("AGOC-3A", "B", "01/01/20 00:00", 15.0),
//!     ChemReading::new("AGOC-3A", "C", "01/01/20 00:00", 15.0),
//!     ChemReading::new("AGOC-3A", "D", "01/01/20 00:00", 25.0),
//! ];
//!
//! let mut diagnostics = Diagnostics::new();
//! let slices = group_by_timestamp(&monitors, &readings, &mut diagnostics);
//!
//! let region = Region::new(Point::new(2, 2), Point::new(4, 4)).unwrap();
//! let result = interpolate_area(&region, &slices);
//!
//! // Readings lie on the plane z = 5 + x + y
//! let grid = &result.grids["01/01/20 00:00"];
//! assert_eq!(grid.len(), 4);
//! assert!((grid[0].value - 9.0).abs() < 1e-9);
//! ```
//!
//! ### Concurrent processing
//!
//! Time slices are independent, so [`do_concurrent`] processes them on
//! Rayon's work-stealing pool. Results are combined after every slice is
//! done and match the sequential output exactly.
//!
//! ```rust,ignore
//! let result = do_concurrent(&region, &slices);
//! for warning in result.diagnostics.warnings() {
//!     eprintln!("warning: {}", warning);
//! }
//! ```
//!
//! ## Failure policy
//!
//! | Failure | Effect |
//! |---------|--------|
//! | Malformed CSV row | Fatal, names the file and line |
//! | Empty or inverted region | Fatal, before any interpolation |
//! | Unknown monitor id | Reading dropped, counted in [`Diagnostics`] |
//! | Fewer than [`MIN_SAMPLES`] distinct positions | Empty grid for that slice |
//! | Collinear positions | Empty grid for that slice |
//! | Unparseable timestamp | Fatal when writing |

pub mod diagnostics;
pub mod error;
mod grid_cell;
pub mod grouping;
pub mod interpolation;
pub mod interpolator;
pub mod loader;
pub mod pipeline;
mod point;
pub mod record;
mod region;
pub mod timestamp;
pub mod triangulation;
pub mod writer;

pub use diagnostics::{Diagnostics, SliceFailure};
pub use error::{InterpolationError, Result};
pub use grid_cell::GridPoint;
pub use grouping::{group_by_timestamp, RawReading, TimeSlices};
pub use interpolation::{
    do_concurrent, evaluate_grid, interpolate_area, process_slice, AreaInterpolation,
    InterpolationResult, MIN_SAMPLES,
};
pub use interpolator::LinearInterpolator;
pub use pipeline::{interpolate_store, run, RunConfig, RunReport};
pub use point::{Coord, Point};
pub use record::{ChemReading, Monitor, ReadingStore};
pub use region::Region;
pub use triangulation::{Location, Triangulation};
pub use writer::{GridWriter, OutputFormat, WriteSummary};
