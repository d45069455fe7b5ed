//! Lightweight grid output representation
//!
//! One interpolated value at one integer site of the requested region.

/// An interpolated value at an integer grid site
///
/// Only sites inside the convex hull of the samples are ever materialized
/// as a `GridPoint`, so `value` is always finite for points produced by
/// the interpolation engine.
///
/// # Example
///
/// ```
/// use geo_area_interpolation::GridPoint;
///
/// let point = GridPoint::new(62, 21, 0.75);
/// assert_eq!(point.x, 62);
/// assert_eq!(point.y, 21);
/// assert_eq!(point.value, 0.75);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// Column of the grid site
    pub x: i64,

    /// Row of the grid site
    pub y: i64,

    /// Interpolated reading at this site
    pub value: f64,
}

impl GridPoint {
    pub fn new(x: i64, y: i64, value: f64) -> Self {
        Self { x, y, value }
    }
}
