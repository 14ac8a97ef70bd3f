// src/edge.rs

use std::cmp::Ordering;

use glam::{DMat2, DVec2};

use crate::geometry::Point2;

/// Closed segment `support + t * direction`, `t` in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    support: DVec2,
    direction: DVec2,
}

impl Edge {
    pub fn new(start: Point2, end: Point2) -> Self {
        let support = start.as_dvec2();
        Self {
            support,
            direction: end.as_dvec2() - support,
        }
    }

    pub fn start(&self) -> Point2 {
        self.support.into()
    }

    pub fn end(&self) -> Point2 {
        (self.support + self.direction).into()
    }

    pub fn point_at(&self, t: f64) -> Point2 {
        (self.support + t * self.direction).into()
    }

    /// Signed distance of `point` from the supporting line, positive on the left.
    /// A zero-length edge reports every point as on the line.
    pub fn signed_offset(&self, point: &Point2) -> f64 {
        let length = self.direction.length();
        if length == 0.0 {
            return 0.0;
        }
        self.direction.perp_dot(point.as_dvec2() - self.support) / length
    }

    /// Point shared by both closed segments, if they cross or touch.
    ///
    /// Parallel, collinear and zero-length segments give `None`: the 2x2 system has no unique
    /// solution. The result does not depend on operand order.
    pub fn intersection_point(&self, other: &Edge) -> Option<Point2> {
        let (first, second) = match self.canonical_cmp(other) {
            Ordering::Greater => (other, self),
            _ => (self, other),
        };
        let (t, _) = first.intersection_parameters(second)?;
        Some(first.point_at(t))
    }

    // support1 + t1 * dir1 = support2 + t2 * dir2
    //   => [-dir1 | dir2] * (t1, t2) = support1 - support2
    fn intersection_parameters(&self, other: &Edge) -> Option<(f64, f64)> {
        let a = DMat2::from_cols(-self.direction, other.direction);
        let frobenius_sq = self.direction.length_squared() + other.direction.length_squared();
        if a.determinant().abs() <= 2.0 * f64::EPSILON * frobenius_sq {
            return None;
        }
        let t = a.inverse() * (self.support - other.support);
        if (0.0..=1.0).contains(&t.x) && (0.0..=1.0).contains(&t.y) {
            Some((t.x, t.y))
        } else {
            None
        }
    }

    fn canonical_cmp(&self, other: &Edge) -> Ordering {
        let lhs = [self.support.x, self.support.y, self.direction.x, self.direction.y];
        let rhs = [other.support.x, other.support.y, other.direction.x, other.direction.y];
        lhs.iter()
            .zip(rhs.iter())
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn edge(ax: f64, ay: f64, bx: f64, by: f64) -> Edge {
        Edge::new(Point2::new(ax, ay), Point2::new(bx, by))
    }

    #[test]
    fn crossing_segments_meet_at_center() {
        let p = edge(0.0, 0.0, 2.0, 2.0)
            .intersection_point(&edge(0.0, 2.0, 2.0, 0.0))
            .unwrap();
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn touching_endpoints_count_as_intersecting() {
        let p = edge(0.0, 0.0, 1.0, 0.0)
            .intersection_point(&edge(1.0, 0.0, 1.0, 1.0))
            .unwrap();
        assert_eq!(p, Point2::new(1.0, 0.0));
    }

    #[test]
    fn parallel_and_collinear_segments_do_not_intersect() {
        assert!(edge(0.0, 0.0, 1.0, 0.0)
            .intersection_point(&edge(0.0, 1.0, 1.0, 1.0))
            .is_none());
        assert!(edge(0.0, 0.0, 2.0, 0.0)
            .intersection_point(&edge(1.0, 0.0, 3.0, 0.0))
            .is_none());
    }

    #[test]
    fn zero_length_segment_does_not_intersect() {
        assert!(edge(1.0, 1.0, 1.0, 1.0)
            .intersection_point(&edge(0.0, 0.0, 2.0, 2.0))
            .is_none());
    }

    #[test]
    fn lines_crossing_outside_the_segments_miss() {
        assert!(edge(0.0, 0.0, 1.0, 0.0)
            .intersection_point(&edge(2.0, -1.0, 2.0, 1.0))
            .is_none());
    }

    #[test]
    fn intersection_is_symmetric() {
        let pairs = [
            (edge(0.1, 0.3, 7.9, 2.2), edge(3.3, -4.0, 2.7, 9.1)),
            (edge(0.0, 10.0, 1.0e6, -1.0e6), edge(10.0, 10.0, 0.0, 10.0)),
            (edge(5.0, 10.0, 4.2, 0.0), edge(0.0, 0.0, 10.0, 0.0)),
            (edge(0.0, 0.0, 1.0, 0.0), edge(3.0, 1.0, 3.0, 2.0)),
        ];
        for (a, b) in pairs {
            assert_eq!(a.intersection_point(&b), b.intersection_point(&a));
        }
    }

    #[test]
    fn signed_offset_is_positive_on_the_left() {
        let e = edge(0.0, 0.0, 2.0, 0.0);
        assert_relative_eq!(e.signed_offset(&Point2::new(1.0, 3.0)), 3.0);
        assert_relative_eq!(e.signed_offset(&Point2::new(1.0, -0.5)), -0.5);
    }
}
