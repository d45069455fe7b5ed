use std::hash::{Hash, Hasher};

/// An integer grid location, used both for region corners and grid sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

/// A real-valued planar position of a sample
///
/// Equality and hashing work on the exact bit patterns of the coordinates,
/// so two samples collide only when they sit at precisely the same spot.
/// `-0.0` is folded into `0.0` first.
#[derive(Debug, Clone, Copy)]
pub struct Coord {
    x: f64,
    y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    fn bits(value: f64) -> u64 {
        if value == 0.0 {
            0.0f64.to_bits()
        } else {
            value.to_bits()
        }
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        Self::bits(self.x) == Self::bits(other.x) && Self::bits(self.y) == Self::bits(other.y)
    }
}

impl Eq for Coord {}

impl Hash for Coord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::bits(self.x).hash(state);
        Self::bits(self.y).hash(state);
    }
}

impl From<Point> for Coord {
    fn from(point: Point) -> Self {
        Self::new(point.x as f64, point.y as f64)
    }
}
