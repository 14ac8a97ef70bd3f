// src/ui.rs

use fov_checker::config::FovCheckerConfig;
use fov_checker::{
    CameraPose, Distance, Footprint, FootprintRequest, FovSpec, RoomRectangle, VisibilityEnvelope,
    VisibleRegion,
};

use crate::rendering_lib::FloorViewport;

/// Width of the control panel in points.
pub const PANEL_WIDTH: f32 = 320.0;

const LABEL_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 0, 255);

/// Slider state. Angles and heights move in whole units.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerParams {
    pub tilt_deg: i32,
    pub pan_deg: i32,
    pub height_cm: i32,
    pub x_position_cm: i32,
    pub target_height_cm: i32,
    pub use_target: bool,
    pub room_width_m: f64,
    pub room_height_m: f64,
}

impl ViewerParams {
    pub fn from_config(config: &FovCheckerConfig) -> Self {
        let pose = config.initial_pose();
        Self {
            tilt_deg: pose.tilt_deg.round() as i32,
            pan_deg: pose.pan_deg.round() as i32,
            height_cm: pose.height_cm.round() as i32,
            x_position_cm: pose.x_position_cm.round() as i32,
            target_height_cm: config.initial.target_height_cm.round() as i32,
            use_target: true,
            room_width_m: config.room.width_m,
            room_height_m: config.room.height_m,
        }
    }

    pub fn room(&self) -> RoomRectangle {
        RoomRectangle {
            width_m: self.room_width_m,
            height_m: self.room_height_m,
        }
    }

    pub fn request(&self, fov: FovSpec) -> FootprintRequest {
        FootprintRequest {
            pose: CameraPose {
                tilt_deg: self.tilt_deg as f64,
                pan_deg: self.pan_deg as f64,
                height_cm: self.height_cm as f64,
                x_position_cm: self.x_position_cm as f64,
            },
            fov,
            room: self.room(),
            target_height_cm: self.use_target.then_some(self.target_height_cm as f64),
        }
    }

    fn max_x_position_cm(&self) -> i32 {
        (self.room_width_m * 100.0).round() as i32
    }
}

pub fn distance_color(distance: Distance) -> egui::Color32 {
    match distance {
        Distance::Finite(_) => egui::Color32::WHITE,
        Distance::Infinite => egui::Color32::GREEN,
        Distance::Invalid => egui::Color32::RED,
    }
}

fn distance_cell(ui: &mut egui::Ui, distance: Option<Distance>) {
    match distance {
        Some(d) => ui.colored_label(distance_color(d), d.to_string()),
        None => ui.weak("-"),
    };
}

fn envelope_grid(ui: &mut egui::Ui, before: &VisibilityEnvelope, after: Option<&VisibilityEnvelope>) {
    egui::Grid::new("envelope_grid").striped(true).show(ui, |ui| {
        ui.label("(m)");
        ui.label("before target");
        ui.label("after target");
        ui.end_row();

        let rows: [(&str, fn(&VisibilityEnvelope) -> Distance); 4] = [
            ("near vertical", |e| e.near_vertical),
            ("far vertical", |e| e.far_vertical),
            ("near horizontal", |e| e.near_horizontal),
            ("far horizontal", |e| e.far_horizontal),
        ];
        for (name, field) in rows {
            ui.label(name);
            distance_cell(ui, Some(field(before)));
            distance_cell(ui, after.map(field));
            ui.end_row();
        }
    });
}

pub fn build_ui(
    ctx: &egui::Context,
    params: &mut ViewerParams,
    fov: &FovSpec,
    footprint: &fov_checker::Result<Footprint>,
) {
    egui::SidePanel::left("controls")
        .exact_width(PANEL_WIDTH)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("FOV Checker");
            ui.label(format!(
                "Lens: {:.0}° x {:.0}°",
                2.0 * fov.half_horizontal_deg,
                2.0 * fov.half_vertical_deg
            ));
            ui.separator();

            ui.add(egui::Slider::new(&mut params.tilt_deg, 0..=90).text("Tilt (°)"));
            ui.add(egui::Slider::new(&mut params.pan_deg, 0..=180).text("Pan (°)"));
            ui.add(egui::Slider::new(&mut params.height_cm, 150..=300).text("Camera height (cm)"));

            ui.add(
                egui::Slider::new(&mut params.room_width_m, 1.0..=30.0)
                    .step_by(0.5)
                    .text("Room width (m)"),
            );
            ui.add(
                egui::Slider::new(&mut params.room_height_m, 1.0..=30.0)
                    .step_by(0.5)
                    .text("Room height (m)"),
            );
            let max_x = params.max_x_position_cm();
            params.x_position_cm = params.x_position_cm.clamp(0, max_x);
            ui.add(egui::Slider::new(&mut params.x_position_cm, 0..=max_x).text("Camera x (cm)"));

            ui.checkbox(&mut params.use_target, "Use target height");
            ui.add_enabled(
                params.use_target,
                egui::Slider::new(&mut params.target_height_cm, 100..=200).text("Target height (cm)"),
            );
            ui.separator();

            match footprint {
                Ok(footprint) => {
                    envelope_grid(ui, &footprint.theoretical, footprint.adjusted.as_ref());
                    ui.separator();
                    let region = &footprint.region;
                    if region.is_fillable() {
                        ui.label(format!("Visible floor: {:.1} m²", region.polygon.area()));
                    } else {
                        ui.colored_label(egui::Color32::RED, "No visible floor area");
                    }
                }
                Err(err) => {
                    ui.colored_label(egui::Color32::RED, err.to_string());
                }
            }
        });
}

/// Writes "(x, y)" next to every vertex of the visible region.
pub fn paint_vertex_labels(ctx: &egui::Context, viewport: &FloorViewport, region: &VisibleRegion) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    let pixels_per_point = ctx.pixels_per_point();
    for vertex in region.polygon.vertices() {
        let on_screen = viewport.to_screen(vertex);
        painter.text(
            egui::pos2(
                on_screen.x as f32 / pixels_per_point,
                on_screen.y as f32 / pixels_per_point,
            ),
            egui::Align2::LEFT_BOTTOM,
            format!("({:.1}, {:.1})", vertex.x, vertex.y),
            egui::FontId::proportional(13.0),
            LABEL_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_start_from_config() {
        let config: FovCheckerConfig = toml::from_str("[room]\nwidth_m = 8.0").unwrap();
        let params = ViewerParams::from_config(&config);
        assert_eq!(params.x_position_cm, 400);
        assert_eq!(params.tilt_deg, 26);
        assert_eq!(params.max_x_position_cm(), 800);
    }

    #[test]
    fn target_toggle_controls_request() {
        let mut params = ViewerParams::from_config(&FovCheckerConfig::default());
        let fov = FovSpec::default();
        assert_eq!(params.request(fov).target_height_cm, Some(180.0));

        params.use_target = false;
        let request = params.request(fov);
        assert_eq!(request.target_height_cm, None);
        assert_eq!(request.room, RoomRectangle::new(10.0, 10.0).unwrap());
        assert_eq!(request.pose.pan_deg, 90.0);
    }

    #[test]
    fn colors_follow_distance_kind() {
        assert_eq!(distance_color(Distance::Finite(1.0)), egui::Color32::WHITE);
        assert_eq!(distance_color(Distance::Infinite), egui::Color32::GREEN);
        assert_eq!(distance_color(Distance::Invalid), egui::Color32::RED);
    }
}
