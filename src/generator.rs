// src/generator.rs

use rand::Rng;

use crate::geometry::{ConvexPolygon, Point2};

pub struct PolygonGenerator;

impl PolygonGenerator {
    /// Random convex, counter-clockwise polygon inscribed in the circle of `radius` around the
    /// center. Vertex angles are jittered around an even spacing, so consecutive vertices never
    /// coincide.
    pub fn generate_convex_polygon(
        rng: &mut impl Rng,
        center_x: f64,
        center_y: f64,
        radius: f64,
        num_vertices: usize,
    ) -> ConvexPolygon {
        let num_vertices = num_vertices.max(3);
        let spacing = 2.0 * std::f64::consts::PI / (num_vertices as f64);
        let max_perturbation = spacing * 0.3;

        let points: Vec<Point2> = (0..num_vertices)
            .map(|i| {
                let angle_rad =
                    (i as f64) * spacing + rng.gen_range(-max_perturbation..max_perturbation);
                Point2::new(
                    center_x + radius * angle_rad.cos(),
                    center_y + radius * angle_rad.sin(),
                )
            })
            .collect();

        ConvexPolygon::from_points(&points)
    }
}
