//! Interpolation Engine
//!
//! Turns each time slice of scattered samples into a dense grid over a
//! rectangular region:
//! 1. Drops samples whose position was already sampled in the slice
//! 2. Builds a piecewise-linear interpolant on the Delaunay triangulation of
//!    the remaining positions
//! 3. Evaluates it at every integer site of the region, x outer and y inner
//! 4. Discards sites outside the convex hull (where the interpolant is `NaN`)
//!
//! Slices are independent of each other. [`interpolate_area`] walks them in
//! order on the calling thread; [`do_concurrent`] hands one slice to each
//! Rayon task. Both produce the same result.

use crate::diagnostics::{Diagnostics, SliceFailure};
use crate::grid_cell::GridPoint;
use crate::grouping::{RawReading, TimeSlices};
use crate::interpolator::LinearInterpolator;
use crate::point::Coord;
use crate::region::Region;
use log::{debug, info};
use std::collections::{BTreeMap, HashSet};

/// Fewest distinct sample positions a slice needs before it is interpolated
pub const MIN_SAMPLES: usize = 4;

/// Grid points per timestamp, in grid-iteration order
///
/// Every timestamp of the input appears as a key; slices that could not be
/// interpolated map to an empty sequence.
pub type InterpolationResult = BTreeMap<String, Vec<GridPoint>>;

/// Output of a whole run: the grids plus everything that went wrong on the way
#[derive(Debug, Default)]
pub struct AreaInterpolation {
    pub grids: InterpolationResult,
    pub diagnostics: Diagnostics,
}

impl AreaInterpolation {
    /// Total number of grid points across all slices
    pub fn point_count(&self) -> usize {
        self.grids.values().map(Vec::len).sum()
    }

    /// Number of slices that produced at least one grid point
    pub fn populated_slices(&self) -> usize {
        self.grids.values().filter(|points| !points.is_empty()).count()
    }
}

/// Evaluate `interpolator` over every site of `region`, keeping defined values only
pub fn evaluate_grid(interpolator: &LinearInterpolator, region: &Region) -> Vec<GridPoint> {
    region
        .sites()
        .filter_map(|site| {
            let value = interpolator.evaluate(site.x as f64, site.y as f64);
            (!value.is_nan()).then(|| GridPoint::new(site.x, site.y, value))
        })
        .collect()
}

/// Interpolate one time slice
///
/// Never fails: a slice with fewer than [`MIN_SAMPLES`] distinct positions,
/// or whose positions cannot be triangulated, yields an empty grid and a
/// recorded [`SliceFailure`].
pub fn process_slice(
    region: &Region,
    timestamp: &str,
    samples: &[RawReading],
) -> (Vec<GridPoint>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();

    let mut seen: HashSet<Coord> = HashSet::with_capacity(samples.len());
    let mut positions = Vec::with_capacity(samples.len());
    let mut values = Vec::with_capacity(samples.len());
    for sample in samples {
        if seen.insert(Coord::new(sample.x, sample.y)) {
            positions.push(Coord::new(sample.x, sample.y));
            values.push(sample.value);
        } else {
            diagnostics.duplicate_samples += 1;
        }
    }

    if positions.len() < MIN_SAMPLES {
        diagnostics.record_slice_failure(
            timestamp,
            SliceFailure::InsufficientPoints {
                distinct: positions.len(),
                required: MIN_SAMPLES,
            },
        );
        return (Vec::new(), diagnostics);
    }

    let interpolator = match LinearInterpolator::new(&positions, &values) {
        Ok(interpolator) => interpolator,
        Err(err) => {
            diagnostics.record_slice_failure(timestamp, SliceFailure::Geometry(err));
            return (Vec::new(), diagnostics);
        }
    };

    let grid = evaluate_grid(&interpolator, region);

    debug!(
        "Slice {}: {} samples, {} triangles, {}/{} grid sites inside hull",
        timestamp,
        positions.len(),
        interpolator.triangulation().triangles().len(),
        grid.len(),
        region.site_count()
    );

    (grid, diagnostics)
}

/// Interpolate every time slice sequentially
pub fn interpolate_area(region: &Region, slices: &TimeSlices) -> AreaInterpolation {
    let results: Vec<(String, Vec<GridPoint>, Diagnostics)> = slices
        .iter()
        .map(|(timestamp, samples)| {
            let (grid, diagnostics) = process_slice(region, timestamp, samples);
            (timestamp.clone(), grid, diagnostics)
        })
        .collect();

    assemble(region, results)
}

/// Interpolate every time slice in parallel
///
/// Each slice is processed by its own Rayon task; results are combined only
/// after all tasks complete, in timestamp order, so the outcome matches
/// [`interpolate_area`] exactly.
///
/// # Example
///
/// ```
/// use geo_area_interpolation::{do_concurrent, Point, RawReading, Region, TimeSlices};
///
/// let mut slices = TimeSlices::new();
/// slices.insert(
///     "1/1/20 0:00".to_string(),
///     vec![
///         RawReading::new(0.0, 0.0, 5.0),
///         RawReading::new(10.0, 0.0, 15.0),
///         RawReading::new(0.0, 10.0, 15.0),
///         RawReading::new(10.0, 10.0, 25.0),
///     ],
/// );
/// let region = Region::new(Point::new(2, 2), Point::new(4, 4)).unwrap();
///
/// let result = do_concurrent(&region, &slices);
/// assert_eq!(result.grids["1/1/20 0:00"].len(), 4);
/// ```
pub fn do_concurrent(region: &Region, slices: &TimeSlices) -> AreaInterpolation {
    use rayon::prelude::*;

    let entries: Vec<(&String, &Vec<RawReading>)> = slices.iter().collect();

    let results: Vec<(String, Vec<GridPoint>, Diagnostics)> = entries
        .into_par_iter()
        .map(|(timestamp, samples)| {
            let (grid, diagnostics) = process_slice(region, timestamp, samples);
            (timestamp.clone(), grid, diagnostics)
        })
        .collect();

    assemble(region, results)
}

fn assemble(
    region: &Region,
    results: Vec<(String, Vec<GridPoint>, Diagnostics)>,
) -> AreaInterpolation {
    let mut outcome = AreaInterpolation::default();
    for (timestamp, grid, diagnostics) in results {
        outcome.diagnostics.merge(diagnostics);
        outcome.grids.insert(timestamp, grid);
    }

    info!(
        "Interpolated {} of {} time slices over {}x{} region: {} grid points",
        outcome.populated_slices(),
        outcome.grids.len(),
        region.width(),
        region.height(),
        outcome.point_count()
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;

    fn plane_slice() -> Vec<RawReading> {
        vec![
            RawReading::new(0.0, 0.0, 5.0),
            RawReading::new(10.0, 0.0, 15.0),
            RawReading::new(0.0, 10.0, 15.0),
            RawReading::new(10.0, 10.0, 25.0),
        ]
    }

    fn region(x0: i64, y0: i64, x1: i64, y1: i64) -> Region {
        Region::new(Point::new(x0, y0), Point::new(x1, y1)).unwrap()
    }

    #[test]
    fn test_process_slice_plane() {
        let (grid, diagnostics) = process_slice(&region(2, 2, 4, 4), "t", &plane_slice());

        let sites: Vec<(i64, i64)> = grid.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(sites, vec![(2, 2), (2, 3), (3, 2), (3, 3)]);
        for p in &grid {
            assert!((p.value - (5.0 + p.x as f64 + p.y as f64)).abs() < 1e-9);
        }
        assert!(diagnostics.is_clean());
    }

    #[test]
    fn test_partial_overlap_keeps_inside_sites_only() {
        let (grid, _) = process_slice(&region(8, 8, 12, 12), "t", &plane_slice());

        // x and y each in {8, 9, 10} fall inside the hull
        assert_eq!(grid.len(), 9);
        assert!(grid.iter().all(|p| p.x <= 10 && p.y <= 10));
    }

    #[test]
    fn test_fewer_than_min_samples_is_empty() {
        let samples = &plane_slice()[..3];
        let (grid, diagnostics) = process_slice(&region(0, 0, 5, 5), "t", samples);

        assert!(grid.is_empty());
        assert!(matches!(
            diagnostics.slice_failures[0].1,
            SliceFailure::InsufficientPoints {
                distinct: 3,
                required: MIN_SAMPLES
            }
        ));
    }

    #[test]
    fn test_duplicate_positions_count_once() {
        let mut samples = plane_slice()[..3].to_vec();
        samples.push(RawReading::new(0.0, 0.0, 99.0));

        let (grid, diagnostics) = process_slice(&region(0, 0, 5, 5), "t", &samples);

        assert!(grid.is_empty());
        assert_eq!(diagnostics.duplicate_samples, 1);
        assert_eq!(diagnostics.slice_failures.len(), 1);
    }

    #[test]
    fn test_first_duplicate_sample_wins() {
        let mut samples = plane_slice();
        samples.push(RawReading::new(0.0, 0.0, 1000.0));

        let (grid, diagnostics) = process_slice(&region(0, 0, 1, 1), "t", &samples);

        assert_eq!(grid, vec![GridPoint::new(0, 0, 5.0)]);
        assert_eq!(diagnostics.duplicate_samples, 1);
    }

    #[test]
    fn test_collinear_slice_is_geometry_failure() {
        let samples: Vec<RawReading> = (0..5)
            .map(|i| RawReading::new(i as f64, 2.0 * i as f64, 1.0))
            .collect();

        let (grid, diagnostics) = process_slice(&region(0, 0, 5, 5), "t", &samples);

        assert!(grid.is_empty());
        assert!(matches!(
            diagnostics.slice_failures[0].1,
            SliceFailure::Geometry(_)
        ));
    }

    #[test]
    fn test_failed_slice_still_keyed() {
        let mut slices = TimeSlices::new();
        slices.insert("a".to_string(), plane_slice());
        slices.insert("b".to_string(), plane_slice()[..2].to_vec());

        let result = interpolate_area(&region(2, 2, 4, 4), &slices);

        assert_eq!(result.grids.len(), 2);
        assert!(result.grids["b"].is_empty());
        assert_eq!(result.populated_slices(), 1);
        assert_eq!(result.point_count(), 4);
    }

    #[test]
    fn test_concurrent_matches_sequential() {
        let mut slices = TimeSlices::new();
        for hour in 0..6 {
            let samples = plane_slice()
                .into_iter()
                .map(|r| RawReading::new(r.x, r.y, r.value * (hour + 1) as f64))
                .collect();
            slices.insert(format!("1/1/20 {}:00", hour), samples);
        }
        slices.insert("broken".to_string(), Vec::new());

        let region = region(-2, -2, 12, 12);
        let sequential = interpolate_area(&region, &slices);
        let concurrent = do_concurrent(&region, &slices);

        assert_eq!(sequential.grids, concurrent.grids);
        assert_eq!(
            sequential.diagnostics.slice_failures.len(),
            concurrent.diagnostics.slice_failures.len()
        );
    }
}
