// tests/footprint.rs

use approx::assert_relative_eq;
use fov_checker::envelope::round_tenth;
use fov_checker::{
    CameraPose, Distance, Footprint, FootprintCache, FootprintRequest, FovSpec, Point2,
    RoomRectangle, VisibilityRegionAssembler, MAX_VERTICES,
};

fn request(tilt_deg: f64, pan_deg: f64, fov: FovSpec, target_height_cm: Option<f64>) -> FootprintRequest {
    FootprintRequest {
        pose: CameraPose {
            tilt_deg,
            pan_deg,
            height_cm: 250.0,
            x_position_cm: 500.0,
        },
        fov,
        room: RoomRectangle::new(10.0, 10.0).unwrap(),
        target_height_cm,
    }
}

fn narrow_fov() -> FovSpec {
    FovSpec::new(20.0, 26.0).unwrap()
}

fn inside_room(room: &RoomRectangle, p: &Point2) -> bool {
    let tol = 1e-6;
    p.x >= -tol && p.x <= room.width_m + tol && p.y >= -tol && p.y <= room.height_m + tol
}

#[test]
fn worked_example_matches_the_formulas() {
    let footprint = Footprint::compute(&request(45.0, 90.0, FovSpec::default(), None)).unwrap();
    let env = footprint.theoretical;

    let near = round_tenth(2.5 * 19.0_f64.to_radians().tan());
    let far = round_tenth(2.5 * 71.0_f64.to_radians().tan());
    assert_eq!(env.near_vertical, Distance::Finite(near));
    assert_eq!(env.far_vertical, Distance::Finite(far));
    assert_eq!(env.far_vertical, Distance::Finite(7.3));
    assert_eq!(
        env.far_horizontal,
        Distance::Finite(round_tenth(2.0 * far.hypot(2.5)))
    );
}

#[test]
fn shallow_tilt_reaches_to_infinity() {
    let footprint = Footprint::compute(&request(10.0, 90.0, FovSpec::default(), None)).unwrap();
    assert_eq!(footprint.theoretical.far_vertical, Distance::Infinite);
    assert_eq!(footprint.theoretical.far_horizontal, Distance::Infinite);
    assert!(matches!(footprint.theoretical.near_vertical, Distance::Finite(_)));
    // The room bounds what the camera can actually see.
    assert!(footprint.region.is_fillable());
    assert!(footprint.region.polygon.area() <= 100.0 + 1e-6);
}

#[test]
fn footprint_inside_the_room_is_the_trapezoid() {
    let req = request(45.0, 90.0, narrow_fov(), None);
    let footprint = Footprint::compute(&req).unwrap();
    let trapezoid = VisibilityRegionAssembler::trapezoid(
        &footprint.theoretical,
        req.room.camera_position(&req.pose),
        req.pose.height_m(),
        &req.fov,
    )
    .unwrap();

    let region = &footprint.region.polygon;
    assert_eq!(region.count(), 4);
    for corner in trapezoid.vertices() {
        assert!(
            region.vertices().iter().any(|v| v.max_norm_distance(corner) <= 1e-9),
            "missing corner {corner:?} in {region:?}"
        );
    }
    assert_relative_eq!(region.area(), trapezoid.area(), max_relative = 1e-9);
}

#[test]
fn panning_toward_the_right_wall_ends_on_the_wall() {
    let req = request(45.0, 140.0, narrow_fov(), None);
    let footprint = Footprint::compute(&req).unwrap();
    let region = &footprint.region;

    assert!(region.rotated_trapezoid.vertices().iter().any(|v| v.x > 10.0));
    assert!(region.polygon.vertices().iter().all(|v| inside_room(&req.room, v)));
    assert!(region
        .polygon
        .vertices()
        .iter()
        .any(|v| (v.x - 10.0).abs() <= 1e-9 && v.y > 0.0 && v.y < 10.0));
    assert!(region.polygon.is_convex_ccw());
}

#[test]
fn target_height_narrows_the_visible_floor() {
    let bare = Footprint::compute(&request(45.0, 90.0, FovSpec::default(), None)).unwrap();
    let with_target =
        Footprint::compute(&request(45.0, 90.0, FovSpec::default(), Some(180.0))).unwrap();

    let adjusted = with_target.adjusted.unwrap();
    assert_eq!(with_target.effective_envelope(), &adjusted);
    assert_eq!(adjusted.near_vertical, bare.theoretical.near_vertical);
    assert_eq!(adjusted.far_vertical, Distance::Finite(round_tenth(7.3 * (1.0 - 180.0 / 250.0))));
    assert!(with_target.region.polygon.area() < bare.region.polygon.area());
}

#[test]
fn pan_sweep_never_leaves_the_room() {
    let fov = FovSpec::default();
    for tilt in [0.0, 10.0, 26.0, 45.0, 64.0, 80.0, 90.0] {
        for pan in (0..=180).step_by(15) {
            for target in [None, Some(120.0), Some(190.0)] {
                let req = request(tilt, pan as f64, fov, target);
                let footprint = Footprint::compute(&req)
                    .unwrap_or_else(|e| panic!("tilt {tilt} pan {pan}: {e}"));

                for d in [
                    footprint.theoretical.near_vertical,
                    footprint.theoretical.far_vertical,
                    footprint.theoretical.near_horizontal,
                    footprint.theoretical.far_horizontal,
                ] {
                    if let Distance::Finite(m) = d {
                        assert!(m >= 0.0, "tilt {tilt}: negative distance {m}");
                    }
                }

                let polygon = &footprint.region.polygon;
                assert!(polygon.count() <= MAX_VERTICES);
                for v in polygon.vertices() {
                    assert!(inside_room(&req.room, v), "tilt {tilt} pan {pan}: {v:?}");
                }
            }
        }
    }
}

#[test]
fn cache_matches_direct_computation() {
    let mut cache = FootprintCache::default();
    for pan in [90.0, 90.0, 120.0, 60.0, 60.0] {
        let req = request(35.0, pan, FovSpec::default(), Some(170.0));
        let direct = Footprint::compute(&req).unwrap();
        assert_eq!(cache.get(req).as_ref().unwrap(), &direct);
    }
}

#[test]
fn out_of_range_inputs_are_errors() {
    let mut req = request(45.0, 90.0, FovSpec::default(), None);
    req.pose.x_position_cm = 1200.0;
    assert!(Footprint::compute(&req).is_err());

    let mut req = request(45.0, 90.0, FovSpec::default(), None);
    req.pose.height_cm = f64::NAN;
    assert!(Footprint::compute(&req).is_err());

    assert!(FovSpec::new(90.0, 26.0).is_err());
}

#[test]
fn near_bound_beyond_the_far_range_still_computes() {
    let req = FootprintRequest {
        pose: CameraPose {
            tilt_deg: 26.0,
            pan_deg: 90.0,
            height_cm: 150.0,
            x_position_cm: 500.0,
        },
        fov: FovSpec::new(45.0, 26.00001).unwrap(),
        room: RoomRectangle::new(10.0, 10.0).unwrap(),
        target_height_cm: Some(200.0),
    };
    let footprint = Footprint::compute(&req).unwrap();
    let adjusted = footprint.adjusted.unwrap();
    assert_eq!(adjusted.far_vertical, Distance::Infinite);
    assert!(footprint.region.rotated_trapezoid.is_convex_ccw());
    assert!(footprint.region.polygon.is_empty());
}
