//! Collision kernel shared by roadmap construction and planning.
//!
//! All predicates are pure and deterministic. Boundary contact counts as a
//! collision for segments, so anything touching an obstacle edge is rejected.

use serde::{Deserialize, Serialize};

use crate::common::{DomainError, DomainResult};

/// Added to the ray-casting denominator so horizontal edges never divide by zero.
const RAY_EPSILON: f64 = 1e-12;
/// Orientation magnitude below which three points are treated as collinear.
const COLLINEAR_EPSILON: f64 = 1e-9;

/// A field coordinate. Serialized as a two element `[x, y]` array, which is
/// the shape used by both the map document and the path broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for [f64; 2] {
    fn from(p: Point2D) -> Self {
        [p.x, p.y]
    }
}

/// Implicitly closed polygon of at least three vertices. Winding is not assumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2D>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2D>) -> DomainResult<Self> {
        if vertices.len() < 3 {
            return Err(DomainError::invalid_map(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if let Some(bad) = vertices.iter().find(|p| !p.is_finite()) {
            return Err(DomainError::invalid_map(format!(
                "polygon vertex ({}, {}) is not finite",
                bad.x, bad.y
            )));
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// Boundary edges, including the closing edge from the last vertex to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn contains(&self, p: &Point2D) -> bool {
        point_in_polygon(p, self)
    }

    pub fn crossed_by(&self, a: &Point2D, b: &Point2D) -> bool {
        self.edges().any(|(c, d)| segments_intersect(a, b, &c, &d))
    }
}

/// The static obstacles of a loaded map. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleSet {
    polygons: Vec<Polygon>,
}

impl ObstacleSet {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// True if `p` lies inside any obstacle.
    pub fn contains(&self, p: &Point2D) -> bool {
        self.polygons.iter().any(|poly| poly.contains(p))
    }

    pub fn blocks(&self, a: &Point2D, b: &Point2D) -> bool {
        edge_blocked(a, b, self)
    }
}

/// Ray-casting parity test: counts crossings of a horizontal ray from `p` towards +x.
pub fn point_in_polygon(p: &Point2D, polygon: &Polygon) -> bool {
    let mut inside = false;
    for (a, b) in polygon.edges() {
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y + RAY_EPSILON) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

fn orientation(p: &Point2D, q: &Point2D, r: &Point2D) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

/// Whether `q` lies inside the bounding box of segment `p`-`r`.
fn within_span(p: &Point2D, q: &Point2D, r: &Point2D) -> bool {
    p.x.min(r.x) <= q.x && q.x <= p.x.max(r.x) && p.y.min(r.y) <= q.y && q.y <= p.y.max(r.y)
}

/// Segment intersection for `a`-`b` against `c`-`d`.
///
/// Inclusive: touching at an endpoint or overlapping collinearly counts as an
/// intersection.
pub fn segments_intersect(a: &Point2D, b: &Point2D, c: &Point2D, d: &Point2D) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }

    (o1.abs() < COLLINEAR_EPSILON && within_span(a, c, b))
        || (o2.abs() < COLLINEAR_EPSILON && within_span(a, d, b))
        || (o3.abs() < COLLINEAR_EPSILON && within_span(c, a, d))
        || (o4.abs() < COLLINEAR_EPSILON && within_span(c, b, d))
}

/// A straight move from `p1` to `p2` is blocked when either endpoint sits inside
/// an obstacle or the segment touches any obstacle boundary.
pub fn edge_blocked(p1: &Point2D, p2: &Point2D, obstacles: &ObstacleSet) -> bool {
    if obstacles.contains(p1) || obstacles.contains(p2) {
        return true;
    }
    obstacles.polygons().iter().any(|poly| poly.crossed_by(p1, p2))
}
