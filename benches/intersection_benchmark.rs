// benches/intersection_benchmark.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fov_checker::generator::PolygonGenerator;
use fov_checker::{
    CameraPose, ConvexIntersection, ConvexPolygon, Footprint, FootprintRequest, FovSpec,
    RoomRectangle, MAX_VERTICES,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn create_test_pair(rng: &mut impl Rng) -> (ConvexPolygon, ConvexPolygon) {
    let vertices1 = rng.gen_range(3..=MAX_VERTICES.min(8));
    let radius1 = rng.gen_range(60.0..100.0);
    let poly1 = PolygonGenerator::generate_convex_polygon(rng, 0.0, 0.0, radius1, vertices1);

    let vertices2 = rng.gen_range(3..=MAX_VERTICES.min(8));
    let radius2 = rng.gen_range(60.0..100.0);
    let poly2 = PolygonGenerator::generate_convex_polygon(rng, 50.0, 0.0, radius2, vertices2);
    (poly1, poly2)
}

fn intersection_benchmark_fn(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);

    const NUM_BENCH_PAIRS: usize = 100;
    let pairs: Vec<(ConvexPolygon, ConvexPolygon)> =
        (0..NUM_BENCH_PAIRS).map(|_| create_test_pair(&mut rng)).collect();

    let mut group = c.benchmark_group("IntersectionOperations");

    group.bench_function("intersect_into_100_pairs_reused_result", |b| {
        let mut result_poly = ConvexPolygon::new();
        let mut pair_iter = pairs.iter().cycle();

        b.iter(|| {
            if let Some((poly1, poly2)) = pair_iter.next() {
                ConvexIntersection::intersect_into(
                    black_box(poly1),
                    black_box(poly2),
                    black_box(&mut result_poly),
                )
            }
        })
    });
    group.finish();
}

fn footprint_benchmark_fn(c: &mut Criterion) {
    let room = RoomRectangle::new(10.0, 10.0).unwrap();
    // One request per pan step, as a slider sweep would produce.
    let requests: Vec<FootprintRequest> = (0..=180)
        .map(|pan| FootprintRequest {
            pose: CameraPose {
                tilt_deg: 35.0,
                pan_deg: pan as f64,
                height_cm: 250.0,
                x_position_cm: 500.0,
            },
            fov: FovSpec::default(),
            room,
            target_height_cm: Some(180.0),
        })
        .collect();

    let mut group = c.benchmark_group("FootprintOperations");
    group.bench_function("compute_pan_sweep", |b| {
        let mut request_iter = requests.iter().cycle();
        b.iter(|| {
            if let Some(request) = request_iter.next() {
                let _ = black_box(Footprint::compute(black_box(request)));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, intersection_benchmark_fn, footprint_benchmark_fn);
criterion_main!(benches);
