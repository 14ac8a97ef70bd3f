// src/region.rs
//
// Turns an envelope into the floor polygon the camera sees inside the room.
//
// Room coordinates: x grows along the camera's wall, y grows away from the far wall, and the
// camera sits on the wall y = room height. With pan at 90 degrees the camera looks toward y = 0.

use glam::DVec2;

use crate::envelope::{CameraPose, Distance, FovSpec, VisibilityEnvelope, VisibilityEnvelopeCalculator};
use crate::error::{ensure, Result};
use crate::geometry::{ConvexPolygon, Point2};
use crate::intersection::ConvexIntersection;

/// Floor distance used in place of an `Infinite` vertical bound when building the trapezoid.
pub const INFINITE_RANGE_SENTINEL: f64 = 1.0e6;

/// Points this close (meters) outside a polygon edge still count as on it during
/// reconstruction.
pub const ON_EDGE_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoomRectangle {
    pub width_m: f64,
    pub height_m: f64,
}

impl RoomRectangle {
    pub fn new(width_m: f64, height_m: f64) -> Result<Self> {
        let room = Self { width_m, height_m };
        room.validate()?;
        Ok(room)
    }

    pub fn validate(&self) -> Result<()> {
        ensure("room_width_m", self.width_m, "a positive room width", |v| v > 0.0)?;
        ensure("room_height_m", self.height_m, "a positive room height", |v| v > 0.0)
    }

    pub fn polygon(&self) -> ConvexPolygon {
        ConvexPolygon::rectangle(self.width_m, self.height_m)
    }

    /// Where a camera mounted at `x_position_cm` on the near wall sits.
    pub fn camera_position(&self, pose: &CameraPose) -> Point2 {
        Point2::new(pose.x_position_m(), self.height_m)
    }
}

/// The clipped footprint plus the intermediate polygons it was built from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleRegion {
    /// Visible floor inside the room. May hold fewer than three vertices when the footprint only
    /// touches the room or misses it entirely.
    pub polygon: ConvexPolygon,
    /// Raw [`ConvexIntersection`] output for the same inputs.
    pub clipped: ConvexPolygon,
    /// The trapezoid after panning, before clipping. Empty when the envelope is invalid.
    pub rotated_trapezoid: ConvexPolygon,
}

impl VisibleRegion {
    /// Whether the region has an area to fill. Degenerate regions should be drawn unfilled.
    pub fn is_fillable(&self) -> bool {
        self.polygon.count() >= 3
    }
}

pub struct VisibilityRegionAssembler;

impl VisibilityRegionAssembler {
    pub fn assemble(
        envelope: &VisibilityEnvelope,
        pose: &CameraPose,
        fov: &FovSpec,
        room: &RoomRectangle,
    ) -> Result<VisibleRegion> {
        room.validate()?;
        pose.validate()?;
        fov.validate()?;
        let room_width_cm = room.width_m * 100.0;
        ensure(
            "x_position_cm",
            pose.x_position_cm,
            "a camera position within the room width",
            |v| v <= room_width_cm,
        )?;

        let camera = room.camera_position(pose);
        let Some(trapezoid) = Self::trapezoid(envelope, camera, pose.height_m(), fov) else {
            log::debug!("envelope has no valid range; region is empty");
            return Ok(VisibleRegion::default());
        };
        let rotated_trapezoid = Self::rotate_about(&trapezoid, camera, pose.pan_deg);

        let room_polygon = room.polygon();
        let clipped = ConvexIntersection::intersect(&room_polygon, &rotated_trapezoid);
        let polygon = Self::reconstruct(&rotated_trapezoid, &room_polygon);
        if polygon.count() != clipped.count() {
            log::debug!(
                "reconstruction kept {} vertices where the clipper kept {}",
                polygon.count(),
                clipped.count()
            );
        }

        Ok(VisibleRegion {
            polygon,
            clipped,
            rotated_trapezoid,
        })
    }

    /// Unpanned footprint in front of `camera`, counter-clockwise from the near-left corner.
    /// `None` when the envelope holds an `Invalid` bound.
    pub fn trapezoid(
        envelope: &VisibilityEnvelope,
        camera: Point2,
        height_m: f64,
        fov: &FovSpec,
    ) -> Option<ConvexPolygon> {
        let depth = |d: Distance| match d {
            Distance::Finite(m) => Some(m),
            Distance::Infinite => Some(INFINITE_RANGE_SENTINEL),
            Distance::Invalid => None,
        };
        let spread = |d: Distance, depth_m: f64| match d {
            Distance::Finite(m) => Some(m),
            Distance::Infinite => Some(VisibilityEnvelopeCalculator::horizontal_extent(
                depth_m,
                height_m,
                fov.half_horizontal_deg,
            )),
            Distance::Invalid => None,
        };

        let near_depth = depth(envelope.near_vertical)?;
        // The far edge has to stay beyond the near edge, however far out the near bound lies.
        let far_depth = match envelope.far_vertical {
            Distance::Infinite => INFINITE_RANGE_SENTINEL.max(2.0 * near_depth),
            far => depth(far)?,
        };
        let near_half = spread(envelope.near_horizontal, near_depth)? / 2.0;
        let far_half = spread(envelope.far_horizontal, far_depth)? / 2.0;

        let near_y = camera.y - near_depth;
        let far_y = camera.y - far_depth;
        Some(ConvexPolygon::from_points(&[
            Point2::new(camera.x - near_half, near_y),
            Point2::new(camera.x - far_half, far_y),
            Point2::new(camera.x + far_half, far_y),
            Point2::new(camera.x + near_half, near_y),
        ]))
    }

    /// Turns every vertex about `pivot` so that a footprint facing straight ahead (bearing -90)
    /// ends up facing the pan direction. Distances from the pivot are preserved.
    pub fn rotate_about(polygon: &ConvexPolygon, pivot: Point2, pan_deg: f64) -> ConvexPolygon {
        let pivot = pivot.as_dvec2();
        let turn_deg = -pan_deg + 90.0;
        let rotated: Vec<Point2> = polygon
            .vertices()
            .iter()
            .map(|v| {
                let offset = v.as_dvec2() - pivot;
                let bearing = (Self::bearing_deg(offset) - turn_deg).to_radians();
                Point2::from(pivot + offset.length() * DVec2::new(bearing.cos(), bearing.sin()))
            })
            .collect();
        ConvexPolygon::from_points(&rotated)
    }

    /// Direction of `offset` in degrees, in (-180, 180].
    ///
    /// An offset straight up or down the y axis is +90 or -90 without dividing by its zero x
    /// component. A zero offset has bearing 0; its radius is zero, so any bearing maps it back
    /// onto the pivot.
    pub fn bearing_deg(offset: DVec2) -> f64 {
        if offset.x == 0.0 {
            if offset.y > 0.0 {
                90.0
            } else if offset.y < 0.0 {
                -90.0
            } else {
                0.0
            }
        } else {
            offset.y.atan2(offset.x).to_degrees()
        }
    }

    /// The visible polygon from every vertex either polygon contributes inside (or on) the other,
    /// and every edge crossing. Unlike [`ConvexIntersection::intersect`], results with fewer than
    /// three vertices are kept.
    fn reconstruct(rotated_trapezoid: &ConvexPolygon, room: &ConvexPolygon) -> ConvexPolygon {
        let candidates = ConvexIntersection::candidate_vertices(rotated_trapezoid, room, |poly, p| {
            poly.contains_within(p, ON_EDGE_TOLERANCE)
        });
        ConvexPolygon::from_points(&ConvexIntersection::order_by_angle(candidates))
    }
}
