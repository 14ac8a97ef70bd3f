// src/geometry.rs

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

use crate::edge::Edge;

pub const MAX_VERTICES: usize = 16;

/// A point on the floor plane, in meters.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Point2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn sub(&self, other: &Point2) -> Point2 {
        Point2::new(self.x - other.x, self.y - other.y)
    }

    /// z component of the 3D cross product; positive when `other` is a left turn from `self`.
    pub fn cross(&self, other: &Point2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Chebyshev (infinity-norm) distance.
    pub fn max_norm_distance(&self, other: &Point2) -> f64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Point2 {
    fn from(v: DVec2) -> Self {
        Point2::new(v.x, v.y)
    }
}

/// Convex, counter-clockwise polygon with a fixed vertex capacity.
///
/// Convexity and winding are a contract of the constructors' callers, not something checked on
/// every operation. [`ConvexPolygon::is_convex_ccw`] is there for debug assertions.
#[derive(Clone, Debug)]
pub struct ConvexPolygon {
    vertices: [Point2; MAX_VERTICES], // Kept private for controlled access
    count: usize,
}

impl Default for ConvexPolygon {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ConvexPolygon {
    fn eq(&self, other: &Self) -> bool {
        self.vertices() == other.vertices()
    }
}

impl ConvexPolygon {
    pub fn new() -> Self {
        Self {
            vertices: [Point2::new(0.0, 0.0); MAX_VERTICES],
            count: 0,
        }
    }

    pub fn from_points(points: &[Point2]) -> Self {
        let mut polygon = Self::new();
        polygon.copy_vertices_from_slice(points);
        polygon
    }

    /// The axis-aligned rectangle `[0, width] x [0, height]`, counter-clockwise from the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, height),
            Point2::new(0.0, height),
        ])
    }

    pub fn vertices(&self) -> &[Point2] {
        &self.vertices[..self.count]
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    pub fn copy_vertices_from_slice(&mut self, slice: &[Point2]) {
        if slice.len() > MAX_VERTICES {
            log::warn!(
                "polygon truncated from {} to {} vertices",
                slice.len(),
                MAX_VERTICES
            );
        }
        let num_to_copy = slice.len().min(MAX_VERTICES);
        self.vertices[..num_to_copy].copy_from_slice(&slice[..num_to_copy]);
        self.count = num_to_copy;
    }

    /// Boundary edges in vertex order, closing back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let vertices = self.vertices();
        (0..vertices.len()).map(move |i| Edge::new(vertices[i], vertices[(i + 1) % vertices.len()]))
    }

    /// Half-plane test: `point` lies left of, or on, every edge.
    pub fn contains(&self, point: &Point2) -> bool {
        self.contains_within(point, 0.0)
    }

    /// Like [`ConvexPolygon::contains`], but accepts points up to `tolerance` meters outside an
    /// edge's supporting line.
    pub fn contains_within(&self, point: &Point2, tolerance: f64) -> bool {
        if self.is_empty() {
            return false;
        }
        self.edges().all(|edge| edge.signed_offset(point) >= -tolerance)
    }

    /// Shoelace area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        if self.count < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..self.count {
            let j = (i + 1) % self.count;
            area += self.vertices[i].x * self.vertices[j].y;
            area -= self.vertices[j].x * self.vertices[i].y;
        }
        area / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Every consecutive vertex triple turns left or goes straight (up to a relative tolerance).
    pub fn is_convex_ccw(&self) -> bool {
        let n = self.count;
        if n < 3 {
            return true;
        }
        let v = self.vertices();
        (0..n).all(|i| {
            let ab = v[(i + 1) % n].sub(&v[i]);
            let bc = v[(i + 2) % n].sub(&v[(i + 1) % n]);
            let scale = ab.dot(&ab).sqrt() * bc.dot(&bc).sqrt();
            ab.cross(&bc) >= -1e-9 * scale
        })
    }
}
