//! Piecewise-linear interpolant over a Delaunay triangulation

use crate::error::{InterpolationError, Result};
use crate::point::Coord;
use crate::triangulation::Triangulation;

/// Linear interpolation inside each triangle of the sample positions
///
/// Undefined outside the convex hull of the samples: [`evaluate`] returns
/// `NaN` there.
///
/// [`evaluate`]: LinearInterpolator::evaluate
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    triangulation: Triangulation,
    values: Vec<f64>,
}

impl LinearInterpolator {
    /// Build an interpolant from positions and their values
    ///
    /// # Errors
    ///
    /// [`InterpolationError::Geometry`] when the lengths differ, a value is
    /// not finite, or the positions cannot be triangulated.
    pub fn new(positions: &[Coord], values: &[f64]) -> Result<Self> {
        if positions.len() != values.len() {
            return Err(InterpolationError::Geometry {
                reason: format!(
                    "{} positions but {} values",
                    positions.len(),
                    values.len()
                ),
            });
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(InterpolationError::Geometry {
                reason: format!("non-finite value {} at position {}", values[idx], idx),
            });
        }

        Ok(Self {
            triangulation: Triangulation::new(positions)?,
            values: values.to_vec(),
        })
    }

    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    /// Interpolated value at `(x, y)`, or `NaN` outside the convex hull
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        match self.triangulation.locate(x, y) {
            Some(location) => {
                let tri = self.triangulation.triangles()[location.triangle];
                location
                    .weights
                    .iter()
                    .zip(tri)
                    .map(|(w, vertex)| w * self.values[vertex])
                    .sum::<f64>()
            }
            None => f64::NAN,
        }
    }
}
