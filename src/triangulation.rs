//! Delaunay triangulation of planar sample positions
//!
//! Bowyer-Watson incremental insertion:
//! 1. Start from a super-triangle enclosing every input position
//! 2. Insert positions one by one, removing every triangle whose circumcircle
//!    contains the new position
//! 3. Re-triangulate the resulting cavity by fanning its boundary edges to the
//!    new position
//! 4. Drop every triangle that still touches a super-triangle vertex
//! 5. Close the notches this can leave along the convex hull, then flip
//!    edges until every interior edge is locally Delaunay
//!
//! A finite super-triangle sits inside the circumcircle of very flat hull
//! triangles, so step 4 can remove real triangles. Step 5 restores them.
//!
//! Predicates run on positions normalized into the unit square so the
//! tolerances below do not depend on the input's coordinate units.
//! Insertion order and tie-breaking are fixed, so the same input always
//! produces the same triangle list.

use crate::error::{InterpolationError, Result};
use crate::point::Coord;
use std::collections::{BTreeMap, BTreeSet};

/// Distance of the super-triangle vertices from the unit square, in normalized units
const SUPER_TRIANGLE_RADIUS: f64 = 1.0e3;

/// Triangles with a smaller normalized doubled area are slivers and discarded
const AREA_EPSILON: f64 = 1.0e-12;

/// Barycentric slack when deciding if a point is inside a triangle
const BARYCENTRIC_EPSILON: f64 = 1.0e-10;

/// A triangulated set of positions
///
/// Every triangle is stored as three indices into [`Triangulation::points`],
/// counter-clockwise.
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<Coord>,
    triangles: Vec<[usize; 3]>,
}

/// Where a query point landed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Index into [`Triangulation::triangles`]
    pub triangle: usize,
    /// Barycentric weights of the triangle's three vertices; they sum to 1
    pub weights: [f64; 3],
}

impl Triangulation {
    /// Triangulate `points`
    ///
    /// Fails with [`InterpolationError::Geometry`] when fewer than three
    /// positions are given, when positions repeat, when values are not
    /// finite, or when every position lies on one line.
    pub fn new(points: &[Coord]) -> Result<Self> {
        if points.len() < 3 {
            return Err(geometry(format!(
                "need at least 3 positions, got {}",
                points.len()
            )));
        }
        if let Some(bad) = points.iter().find(|p| !p.x().is_finite() || !p.y().is_finite()) {
            return Err(geometry(format!(
                "non-finite position ({}, {})",
                bad.x(),
                bad.y()
            )));
        }

        let normalized = normalize(points)?;
        let n = normalized.len();

        // Super-triangle vertices live at indices n, n+1, n+2
        let mut vertices = normalized;
        let r = SUPER_TRIANGLE_RADIUS;
        let half_sqrt3 = 3.0_f64.sqrt() / 2.0;
        vertices.push([0.5 - half_sqrt3 * r, 0.5 - r / 2.0]);
        vertices.push([0.5 + half_sqrt3 * r, 0.5 - r / 2.0]);
        vertices.push([0.5, 0.5 + r]);

        let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];

        for i in 0..n {
            let p = vertices[i];

            let bad: Vec<bool> = triangles
                .iter()
                .map(|tri| in_circumcircle(&vertices, tri, p))
                .collect();

            // Cavity boundary: edges owned by exactly one bad triangle
            let mut edge_count: BTreeMap<(usize, usize), usize> = BTreeMap::new();
            for (tri, &is_bad) in triangles.iter().zip(&bad) {
                if !is_bad {
                    continue;
                }
                for k in 0..3 {
                    *edge_count
                        .entry(normalize_edge(tri[k], tri[(k + 1) % 3]))
                        .or_insert(0) += 1;
                }
            }

            let mut next: Vec<[usize; 3]> = triangles
                .iter()
                .zip(&bad)
                .filter_map(|(tri, &is_bad)| (!is_bad).then_some(*tri))
                .collect();

            for ((a, b), count) in edge_count {
                if count == 1 {
                    next.push(oriented(&vertices, [a, b, i]));
                }
            }

            triangles = next;
        }

        let mut triangles: Vec<[usize; 3]> = triangles
            .into_iter()
            .filter(|tri| tri.iter().all(|&v| v < n))
            .collect();

        if fill_hull_notches(&vertices[..n], &mut triangles) > 0 {
            legalize(&vertices[..n], &mut triangles);
        }

        let triangles: Vec<[usize; 3]> = triangles
            .into_iter()
            .filter(|tri| doubled_area(&vertices, tri).abs() > AREA_EPSILON)
            .collect();

        if triangles.is_empty() {
            return Err(geometry(
                "triangulation produced no triangles (positions may be collinear)".to_string(),
            ));
        }

        Ok(Self {
            points: points.to_vec(),
            triangles,
        })
    }

    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Find the first triangle containing `(x, y)`
    ///
    /// Returns `None` outside the convex hull. Points on a shared edge are
    /// attributed to the lowest-indexed triangle touching them.
    pub fn locate(&self, x: f64, y: f64) -> Option<Location> {
        self.triangles
            .iter()
            .enumerate()
            .find_map(|(idx, tri)| {
                self.barycentric(tri, x, y).map(|weights| Location {
                    triangle: idx,
                    weights,
                })
            })
    }

    /// Whether `(x, y)` lies inside or on the convex hull
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.locate(x, y).is_some()
    }

    fn barycentric(&self, tri: &[usize; 3], px: f64, py: f64) -> Option<[f64; 3]> {
        let (x0, y0) = (self.points[tri[0]].x(), self.points[tri[0]].y());
        let (x1, y1) = (self.points[tri[1]].x(), self.points[tri[1]].y());
        let (x2, y2) = (self.points[tri[2]].x(), self.points[tri[2]].y());

        let denom = (y1 - y2) * (x0 - x2) + (x2 - x1) * (y0 - y2);
        if denom == 0.0 {
            return None;
        }

        let a = ((y1 - y2) * (px - x2) + (x2 - x1) * (py - y2)) / denom;
        let b = ((y2 - y0) * (px - x2) + (x0 - x2) * (py - y2)) / denom;
        let c = 1.0 - a - b;

        if a >= -BARYCENTRIC_EPSILON && b >= -BARYCENTRIC_EPSILON && c >= -BARYCENTRIC_EPSILON {
            Some([a, b, c])
        } else {
            None
        }
    }
}

/// Add a triangle across every concave corner of the mesh boundary
///
/// The boundary is walked through its directed edges: `a -> b` is a boundary
/// edge when no triangle holds `b -> a`. A right turn `a -> b -> c` at a
/// vertex with one boundary edge in and one out is closed with `[a, c, b]`,
/// provided no other position falls inside it. Repeats until the boundary is
/// convex. Returns the number of triangles added.
fn fill_hull_notches(vertices: &[[f64; 2]], triangles: &mut Vec<[usize; 3]>) -> usize {
    let mut added = 0;

    loop {
        let edges: BTreeSet<(usize, usize)> = triangles
            .iter()
            .flat_map(|tri| (0..3).map(move |k| (tri[k], tri[(k + 1) % 3])))
            .collect();

        let mut outgoing: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut incoming: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for &(a, b) in &edges {
            if !edges.contains(&(b, a)) {
                outgoing.entry(a).or_default().push(b);
                incoming.entry(b).or_default().push(a);
            }
        }

        let notch = incoming.iter().find_map(|(&b, from)| {
            let to = outgoing.get(&b)?;
            let ([a], [c]) = (from.as_slice(), to.as_slice()) else {
                return None;
            };
            let candidate = [*a, *c, b];
            let fillable = *a != *c
                && doubled_area(vertices, &candidate) > AREA_EPSILON
                && !(0..vertices.len())
                    .filter(|v| !candidate.contains(v))
                    .any(|v| covers(vertices, &candidate, vertices[v]));
            fillable.then_some(candidate)
        });

        match notch {
            Some(tri) => {
                triangles.push(tri);
                added += 1;
            }
            None => return added,
        }
    }
}

/// Lawson flips until no interior edge fails the in-circle test
fn legalize(vertices: &[[f64; 2]], triangles: &mut [[usize; 3]]) {
    // Rounding can flip near-cocircular quads back and forth
    let max_flips = triangles.len() * triangles.len() + 1;

    for _ in 0..max_flips {
        let owner: BTreeMap<(usize, usize), usize> = triangles
            .iter()
            .enumerate()
            .flat_map(|(t, tri)| (0..3).map(move |k| ((tri[k], tri[(k + 1) % 3]), t)))
            .collect();

        let flip = owner.iter().find_map(|(&(a, b), &t)| {
            let u = *owner.get(&(b, a))?;
            let c = apex(&triangles[t], a, b)?;
            let d = apex(&triangles[u], a, b)?;
            let (left, right) = ([c, a, d], [d, b, c]);
            let flips = in_circumcircle(vertices, &triangles[t], vertices[d])
                && doubled_area(vertices, &left) > 0.0
                && doubled_area(vertices, &right) > 0.0;
            flips.then_some((t, u, left, right))
        });

        match flip {
            Some((t, u, left, right)) => {
                triangles[t] = left;
                triangles[u] = right;
            }
            None => return,
        }
    }
}

/// The vertex of `tri` that is neither `a` nor `b`
fn apex(tri: &[usize; 3], a: usize, b: usize) -> Option<usize> {
    tri.iter().copied().find(|&v| v != a && v != b)
}

/// Whether `p` lies inside or on the counter-clockwise triangle `tri`
fn covers(vertices: &[[f64; 2]], tri: &[usize; 3], p: [f64; 2]) -> bool {
    (0..3).all(|k| {
        let [ax, ay] = vertices[tri[k]];
        let [bx, by] = vertices[tri[(k + 1) % 3]];
        (bx - ax) * (p[1] - ay) - (by - ay) * (p[0] - ax) >= 0.0
    })
}

fn geometry(reason: String) -> InterpolationError {
    InterpolationError::Geometry { reason }
}

/// Map positions into the unit square, preserving aspect ratio
fn normalize(points: &[Coord]) -> Result<Vec<[f64; 2]>> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in points {
        min_x = min_x.min(p.x());
        max_x = max_x.max(p.x());
        min_y = min_y.min(p.y());
        max_y = max_y.max(p.y());
    }

    let scale = (max_x - min_x).max(max_y - min_y);
    if scale <= 0.0 || !scale.is_finite() {
        return Err(geometry("all positions coincide".to_string()));
    }

    Ok(points
        .iter()
        .map(|p| [(p.x() - min_x) / scale, (p.y() - min_y) / scale])
        .collect())
}

fn normalize_edge(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

/// Twice the signed area; positive for counter-clockwise triangles
fn doubled_area(vertices: &[[f64; 2]], tri: &[usize; 3]) -> f64 {
    let [ax, ay] = vertices[tri[0]];
    let [bx, by] = vertices[tri[1]];
    let [cx, cy] = vertices[tri[2]];
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

fn oriented(vertices: &[[f64; 2]], tri: [usize; 3]) -> [usize; 3] {
    if doubled_area(vertices, &tri) < 0.0 {
        [tri[1], tri[0], tri[2]]
    } else {
        tri
    }
}

/// Strict in-circle test for a counter-clockwise triangle
fn in_circumcircle(vertices: &[[f64; 2]], tri: &[usize; 3], p: [f64; 2]) -> bool {
    let [ax, ay] = vertices[tri[0]];
    let [bx, by] = vertices[tri[1]];
    let [cx, cy] = vertices[tri[2]];
    let (adx, ady) = (ax - p[0], ay - p[1]);
    let (bdx, bdy) = (bx - p[0], by - p[1]);
    let (cdx, cdy) = (cx - p[0], cy - p[1]);

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    let det = adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx)
        + ad * (bdx * cdy - bdy * cdx);

    let det = if doubled_area(vertices, tri) < 0.0 { -det } else { det };
    det > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(raw: &[(f64, f64)]) -> Vec<Coord> {
        raw.iter().map(|&(x, y)| Coord::new(x, y)).collect()
    }

    #[test]
    fn test_square_gives_two_triangles() {
        let tri =
            Triangulation::new(&coords(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)]))
                .unwrap();
        assert_eq!(tri.triangles().len(), 2);
    }

    #[test]
    fn test_triangles_are_counter_clockwise() {
        let points = coords(&[(0.0, 0.0), (4.0, 1.0), (2.0, 5.0), (7.0, 6.0), (3.0, 2.0)]);
        let tri = Triangulation::new(&points).unwrap();

        for t in tri.triangles() {
            let [a, b, c] = [points[t[0]], points[t[1]], points[t[2]]];
            let area = (b.x() - a.x()) * (c.y() - a.y()) - (b.y() - a.y()) * (c.x() - a.x());
            assert!(area > 0.0, "triangle {:?} is not counter-clockwise", t);
        }
    }

    #[test]
    fn test_interior_point_splits_triangle() {
        let tri =
            Triangulation::new(&coords(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0), (5.0, 3.0)]))
                .unwrap();
        assert_eq!(tri.triangles().len(), 3);
    }

    #[test]
    fn test_collinear_positions_fail() {
        let err = Triangulation::new(&coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]))
            .unwrap_err();
        assert!(matches!(err, InterpolationError::Geometry { .. }));
    }

    #[test]
    fn test_coincident_positions_fail() {
        let err = Triangulation::new(&coords(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)])).unwrap_err();
        assert!(matches!(err, InterpolationError::Geometry { .. }));
    }

    #[test]
    fn test_too_few_positions_fail() {
        assert!(Triangulation::new(&coords(&[(0.0, 0.0), (1.0, 0.0)])).is_err());
    }

    #[test]
    fn test_locate_inside_and_outside() {
        let tri =
            Triangulation::new(&coords(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)]))
                .unwrap();

        let loc = tri.locate(2.0, 3.0).unwrap();
        let sum: f64 = loc.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);

        // Corners and edges of the hull count as inside
        assert!(tri.contains(0.0, 0.0));
        assert!(tri.contains(10.0, 5.0));

        assert!(!tri.contains(10.5, 5.0));
        assert!(!tri.contains(-1.0, -1.0));
    }

    #[test]
    fn test_same_input_same_triangles() {
        let points = coords(&[
            (62.0, 21.0),
            (66.0, 35.0),
            (76.0, 41.0),
            (88.0, 45.0),
            (103.0, 43.0),
            (102.0, 22.0),
            (89.0, 3.0),
            (74.0, 7.0),
            (119.0, 42.0),
        ]);
        let a = Triangulation::new(&points).unwrap();
        let b = Triangulation::new(&points).unwrap();
        assert_eq!(a.triangles(), b.triangles());
    }

    #[test]
    fn test_flat_hull_triangle_is_kept() {
        // (10000, 2) sits just above the base, so the base triangle is very flat
        let points = coords(&[(0.0, 0.0), (20000.0, 0.0), (10000.0, 2.0), (10000.0, 20000.0)]);
        let tri = Triangulation::new(&points).unwrap();

        assert_eq!(tri.points(), &points[..]);
        assert_eq!(tri.triangles().len(), 3);
        assert!(tri.triangles().iter().any(|t| {
            let mut sorted = *t;
            sorted.sort_unstable();
            sorted == [0, 1, 2]
        }));

        for x in 9990..10010 {
            for y in 0..3 {
                assert!(tri.contains(x as f64, y as f64), "({}, {}) is inside the hull", x, y);
            }
        }
        assert!(!tri.contains(10000.0, -1.0));
    }

    #[test]
    fn test_flat_hull_edges_are_covered() {
        // Several positions hugging a long base edge
        let points = coords(&[
            (0.0, 0.0),
            (30000.0, 0.0),
            (15000.0, 30000.0),
            (7000.0, 1.0),
            (15000.0, 2.0),
            (23000.0, 1.0),
        ]);
        let tri = Triangulation::new(&points).unwrap();

        let area: f64 = tri
            .triangles()
            .iter()
            .map(|t| doubled_area_of(&points, t) / 2.0)
            .sum();
        assert!((area - 30000.0 * 30000.0 / 2.0).abs() < 1e-3, "area {}", area);

        for t in tri.triangles() {
            assert!(doubled_area_of(&points, t) > 0.0, "{:?} is not counter-clockwise", t);
        }
        for x in (1000..29000).step_by(500) {
            assert!(tri.contains(x as f64, 0.5), "({}, 0.5) is inside the hull", x);
        }
    }

    fn doubled_area_of(points: &[Coord], t: &[usize; 3]) -> f64 {
        let [a, b, c] = [points[t[0]], points[t[1]], points[t[2]]];
        (b.x() - a.x()) * (c.y() - a.y()) - (b.y() - a.y()) * (c.x() - a.x())
    }

    #[test]
    fn test_triangle_areas_cover_hull() {
        // Convex pentagon with one interior point: the triangles must tile the hull exactly
        let points = coords(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (5.0, 3.0),
            (2.0, 5.0),
            (-1.0, 3.0),
            (2.0, 2.0),
        ]);
        let tri = Triangulation::new(&points).unwrap();

        let total: f64 = tri
            .triangles()
            .iter()
            .map(|t| {
                let [a, b, c] = [points[t[0]], points[t[1]], points[t[2]]];
                ((b.x() - a.x()) * (c.y() - a.y()) - (b.y() - a.y()) * (c.x() - a.x())) / 2.0
            })
            .sum();

        // Shoelace area of the pentagon hull
        let hull = [(0.0, 0.0), (4.0, 0.0), (5.0, 3.0), (2.0, 5.0), (-1.0, 3.0)];
        let mut shoelace = 0.0;
        for i in 0..hull.len() {
            let (x1, y1) = hull[i];
            let (x2, y2) = hull[(i + 1) % hull.len()];
            shoelace += x1 * y2 - x2 * y1;
        }
        assert!((total - shoelace / 2.0).abs() < 1e-9);
        assert_eq!(tri.triangles().len(), 5);
    }
}
