//! Rectangular evaluation region
//!
//! A region is half-open on both axes: `x` runs over `[start.x, end.x)` and
//! `y` over `[start.y, end.y)`, one grid site per integer step.

use crate::error::{InterpolationError, Result};
use crate::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    start: Point,
    end: Point,
}

impl Region {
    /// Build a region, rejecting empty or inverted rectangles
    pub fn new(start: Point, end: Point) -> Result<Self> {
        if start.x >= end.x || start.y >= end.y {
            return Err(InterpolationError::Region {
                x0: start.x,
                y0: start.y,
                x1: end.x,
                y1: end.y,
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn width(&self) -> u64 {
        self.start.x.abs_diff(self.end.x)
    }

    pub fn height(&self) -> u64 {
        self.start.y.abs_diff(self.end.y)
    }

    /// Number of grid sites in the region
    pub fn site_count(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }

    /// Grid sites with x as the outer loop and y as the inner loop
    pub fn sites(&self) -> impl Iterator<Item = Point> {
        let (y0, y1) = (self.start.y, self.end.y);
        (self.start.x..self.end.x).flat_map(move |x| (y0..y1).map(move |y| Point::new(x, y)))
    }
}
