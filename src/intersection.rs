// src/intersection.rs

use crate::geometry::{ConvexPolygon, Point2};

/// Vertices closer than this (infinity norm, meters) are merged.
pub const VERTEX_MERGE_TOLERANCE: f64 = 1e-7;

/// Intersection of two convex, counter-clockwise polygons.
///
/// The result is assembled from candidate vertices: the vertices of each polygon contained in the
/// other plus every pairwise edge crossing. Candidates are ordered by angle around the midpoint of
/// their bounding box, which is exact for convex candidate sets only.
pub struct ConvexIntersection;

impl ConvexIntersection {
    pub fn intersect(poly1: &ConvexPolygon, poly2: &ConvexPolygon) -> ConvexPolygon {
        let mut result = ConvexPolygon::new();
        Self::intersect_into(poly1, poly2, &mut result);
        result
    }

    /// Writes the intersection into `result_poly`, leaving it empty when the overlap has fewer
    /// than three distinct vertices.
    ///
    /// Both inputs must be convex and counter-clockwise. Debug builds assert it; release builds
    /// return an unspecified polygon otherwise.
    pub fn intersect_into(
        poly1: &ConvexPolygon,
        poly2: &ConvexPolygon,
        result_poly: &mut ConvexPolygon,
    ) {
        debug_assert!(poly1.is_convex_ccw(), "clip input is not convex CCW: {poly1:?}");
        debug_assert!(poly2.is_convex_ccw(), "clip input is not convex CCW: {poly2:?}");

        let candidates = Self::candidate_vertices(poly1, poly2, |poly, p| poly.contains(p));
        let ordered = Self::order_by_angle(candidates);
        log::trace!("convex intersection: {} vertices", ordered.len());

        if ordered.len() < 3 {
            result_poly.clear();
        } else {
            result_poly.copy_vertices_from_slice(&ordered);
        }
    }

    /// Vertices of each polygon accepted by `contains` against the other, followed by all
    /// edge-edge intersection points. May contain duplicates.
    pub fn candidate_vertices(
        poly1: &ConvexPolygon,
        poly2: &ConvexPolygon,
        contains: impl Fn(&ConvexPolygon, &Point2) -> bool,
    ) -> Vec<Point2> {
        let mut candidates = Vec::with_capacity(poly1.count() + poly2.count() + 8);
        candidates.extend(poly1.vertices().iter().filter(|p| contains(poly2, p)));
        candidates.extend(poly2.vertices().iter().filter(|p| contains(poly1, p)));
        for edge1 in poly1.edges() {
            candidates.extend(poly2.edges().filter_map(|edge2| edge1.intersection_point(&edge2)));
        }
        candidates
    }

    /// Sorts by ascending `atan2` around the bounding-box midpoint and merges consecutive
    /// vertices within [`VERTEX_MERGE_TOLERANCE`], keeping the first of each run. The last vertex
    /// is also merged into the first.
    pub fn order_by_angle(mut points: Vec<Point2>) -> Vec<Point2> {
        let Some(pivot) = bounding_box_midpoint(&points) else {
            return points;
        };
        let angle = |p: &Point2| (p.y - pivot.y).atan2(p.x - pivot.x);
        points.sort_by(|a, b| angle(a).total_cmp(&angle(b)));

        points.dedup_by(|current, kept| current.max_norm_distance(kept) <= VERTEX_MERGE_TOLERANCE);
        while points.len() > 1
            && points[points.len() - 1].max_norm_distance(&points[0]) <= VERTEX_MERGE_TOLERANCE
        {
            points.pop();
        }
        points
    }
}

fn bounding_box_midpoint(points: &[Point2]) -> Option<Point2> {
    let first = points.first()?;
    let (mut min, mut max) = (*first, *first);
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(Point2::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0))
}
