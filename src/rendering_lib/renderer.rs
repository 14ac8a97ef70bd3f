// src/rendering_lib/renderer.rs

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::vertex::Vertex;
use fov_checker::{ConvexIntersection, ConvexPolygon, Point2, RoomRectangle, VisibleRegion};

const RENDERER_MAX_VERTICES: usize = 4096;
const RENDERER_MAX_INDICES: usize = RENDERER_MAX_VERTICES * 2;

/// Pixels kept free around the room on every side.
const VIEWPORT_MARGIN_PX: f64 = 40.0;

const ROOM_OUTLINE_COLOR: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
const REGION_FILL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.55];
const REGION_OUTLINE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const DEGENERATE_REGION_COLOR: [f32; 4] = [1.0, 0.6, 0.2, 1.0];
const TRAPEZOID_OUTLINE_COLOR: [f32; 4] = [0.3, 0.55, 0.9, 0.8];
const CAMERA_MARKER_COLOR: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

const OUTLINE_THICKNESS_PX: f64 = 2.0;
const MARKER_RADIUS_PX: f64 = 7.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ScreenDimensionsUniform {
    width: f32,
    height: f32,
    _padding1: f32,
    _padding2: f32,
}

/// Maps floor coordinates in meters to screen pixels. The far wall (y = 0) is drawn at the top
/// and the camera wall at the bottom, so no axis flip is needed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorViewport {
    pub scale: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl FloorViewport {
    /// Largest uniform scale that fits the room right of `left_inset` pixels, centered.
    pub fn fit(room: &RoomRectangle, screen_width: f32, screen_height: f32, left_inset: f32) -> Self {
        let available_w = (screen_width as f64 - left_inset as f64 - 2.0 * VIEWPORT_MARGIN_PX).max(1.0);
        let available_h = (screen_height as f64 - 2.0 * VIEWPORT_MARGIN_PX).max(1.0);
        let scale = (available_w / room.width_m).min(available_h / room.height_m);

        Self {
            scale,
            origin_x: left_inset as f64
                + VIEWPORT_MARGIN_PX
                + (available_w - room.width_m * scale) / 2.0,
            origin_y: VIEWPORT_MARGIN_PX + (available_h - room.height_m * scale) / 2.0,
        }
    }

    pub fn to_screen(&self, p: &Point2) -> Point2 {
        Point2::new(self.origin_x + p.x * self.scale, self.origin_y + p.y * self.scale)
    }

    pub fn polygon_to_screen(&self, polygon: &ConvexPolygon) -> ConvexPolygon {
        let points: Vec<Point2> = polygon.vertices().iter().map(|p| self.to_screen(p)).collect();
        ConvexPolygon::from_points(&points)
    }
}

/// What one frame of the floor plan shows.
pub struct FloorScene<'a> {
    pub viewport: FloorViewport,
    pub room: RoomRectangle,
    pub camera: Point2,
    /// `None` when the last computation failed.
    pub region: Option<&'a VisibleRegion>,
}

pub struct Renderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,

    frame_vertices: Vec<Vertex>,
    frame_indices: Vec<u16>,
    overflow_reported: bool,

    screen_uniform_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        shader_source: &str,
        initial_screen_width: f32,
        initial_screen_height: f32,
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Floor Shader Module"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let screen_uniform_data = ScreenDimensionsUniform {
            width: initial_screen_width,
            height: initial_screen_height,
            _padding1: 0.0,
            _padding2: 0.0,
        };
        let screen_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Screen Dimensions Uniform Buffer"),
            contents: bytemuck::bytes_of(&screen_uniform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let screen_bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("screen_dimensions_bind_group_layout"),
        });

        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &screen_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_uniform_buffer.as_entire_binding(),
            }],
            label: Some("screen_dimensions_bind_group"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Floor Pipeline Layout"),
                bind_group_layouts: &[&screen_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Floor Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Floor Vertex Buffer"),
            size: (RENDERER_MAX_VERTICES * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Floor Index Buffer"),
            size: (RENDERER_MAX_INDICES * std::mem::size_of::<u16>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            render_pipeline,
            vertex_buffer,
            index_buffer,
            frame_vertices: Vec::with_capacity(RENDERER_MAX_VERTICES),
            frame_indices: Vec::with_capacity(RENDERER_MAX_INDICES),
            overflow_reported: false,
            screen_uniform_buffer,
            screen_bind_group,
        }
    }

    fn has_room_for(&mut self, vertices: usize, indices: usize) -> bool {
        // Odd index counts get one padding index at upload.
        let fits = self.frame_vertices.len() + vertices <= RENDERER_MAX_VERTICES
            && self.frame_indices.len() + indices < RENDERER_MAX_INDICES;
        if !fits && !self.overflow_reported {
            log::warn!("Frame data exceeds pre-allocated buffer capacity, dropping shapes");
            self.overflow_reported = true;
        }
        fits
    }

    fn add_polygon_to_frame(&mut self, polygon: &ConvexPolygon, color: [f32; 4]) {
        let count = polygon.count();
        if count < 3 || !self.has_room_for(count, (count - 2) * 3) {
            return;
        }
        let start_vertex_index = self.frame_vertices.len() as u16;
        for point in polygon.vertices() {
            self.frame_vertices
                .push(Vertex::new([point.x as f32, point.y as f32], color));
        }
        for i in 1..(count as u16 - 1) {
            self.frame_indices.push(start_vertex_index);
            self.frame_indices.push(start_vertex_index + i);
            self.frame_indices.push(start_vertex_index + i + 1);
        }
    }

    /// Thick line from `a` to `b` as a two-triangle quad.
    fn add_segment_to_frame(&mut self, a: &Point2, b: &Point2, thickness: f64, color: [f32; 4]) {
        let direction = b.sub(a);
        let length = direction.dot(&direction).sqrt();
        if length == 0.0 {
            return;
        }
        let half = thickness / 2.0;
        let normal = Point2::new(-direction.y / length * half, direction.x / length * half);
        let corners = [
            Point2::new(a.x + normal.x, a.y + normal.y),
            Point2::new(b.x + normal.x, b.y + normal.y),
            Point2::new(b.x - normal.x, b.y - normal.y),
            Point2::new(a.x - normal.x, a.y - normal.y),
        ];
        self.add_polygon_to_frame(&ConvexPolygon::from_points(&corners), color);
    }

    /// Closed outline for three or more vertices, a single segment for two.
    fn add_outline_to_frame(&mut self, polygon: &ConvexPolygon, thickness: f64, color: [f32; 4]) {
        match polygon.vertices() {
            [] | [_] => {}
            [a, b] => self.add_segment_to_frame(a, b, thickness, color),
            _ => {
                for edge in polygon.edges() {
                    self.add_segment_to_frame(&edge.start(), &edge.end(), thickness, color);
                }
            }
        }
    }

    fn add_marker_to_frame(&mut self, center: &Point2, radius: f64, color: [f32; 4]) {
        let diamond = [
            Point2::new(center.x, center.y + radius),
            Point2::new(center.x + radius, center.y),
            Point2::new(center.x, center.y - radius),
            Point2::new(center.x - radius, center.y),
        ];
        self.add_polygon_to_frame(&ConvexPolygon::from_points(&diamond), color);
    }

    fn add_scene_to_frame(&mut self, scene: &FloorScene, screen_width: f32, screen_height: f32) {
        let viewport = &scene.viewport;
        let screen = ConvexPolygon::rectangle(screen_width as f64, screen_height as f64);

        if let Some(region) = scene.region {
            // The trapezoid can reach out to the far-range sentinel; keep only what is on screen.
            let trapezoid = viewport.polygon_to_screen(&region.rotated_trapezoid);
            if trapezoid.count() >= 3 {
                let on_screen = ConvexIntersection::intersect(&trapezoid, &screen);
                self.add_outline_to_frame(&on_screen, OUTLINE_THICKNESS_PX, TRAPEZOID_OUTLINE_COLOR);
            }

            let footprint = viewport.polygon_to_screen(&region.polygon);
            if region.is_fillable() {
                self.add_polygon_to_frame(&footprint, REGION_FILL_COLOR);
                self.add_outline_to_frame(&footprint, OUTLINE_THICKNESS_PX, REGION_OUTLINE_COLOR);
            } else {
                self.add_outline_to_frame(&footprint, OUTLINE_THICKNESS_PX, DEGENERATE_REGION_COLOR);
                if let [single] = footprint.vertices() {
                    self.add_marker_to_frame(single, MARKER_RADIUS_PX / 2.0, DEGENERATE_REGION_COLOR);
                }
            }
        }

        let room = viewport.polygon_to_screen(&scene.room.polygon());
        self.add_outline_to_frame(&room, OUTLINE_THICKNESS_PX, ROOM_OUTLINE_COLOR);
        self.add_marker_to_frame(&viewport.to_screen(&scene.camera), MARKER_RADIUS_PX, CAMERA_MARKER_COLOR);
    }

    pub fn render_floor(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
        scene: &FloorScene,
        screen_width: f32,
        screen_height: f32,
        clear_color: wgpu::Color,
    ) {
        let screen_uniform_data = ScreenDimensionsUniform {
            width: screen_width,
            height: screen_height,
            _padding1: 0.0,
            _padding2: 0.0,
        };
        queue.write_buffer(&self.screen_uniform_buffer, 0, bytemuck::bytes_of(&screen_uniform_data));

        self.frame_vertices.clear();
        self.frame_indices.clear();
        self.add_scene_to_frame(scene, screen_width, screen_height);

        if !self.frame_vertices.is_empty() && !self.frame_indices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.frame_vertices));
            let mut padded_indices_data = self.frame_indices.clone();
            // Buffer writes must be a multiple of 4 bytes
            if padded_indices_data.len() % 2 == 1 {
                padded_indices_data.push(0);
            }
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&padded_indices_data));
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Floor Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: output_view,
                    resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Clear(clear_color), store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: None, occlusion_query_set: None, timestamp_writes: None,
            });

            if !self.frame_vertices.is_empty() && !self.frame_indices.is_empty() {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.screen_bind_group, &[]);

                let vertex_buffer_slice_size = (self.frame_vertices.len() * std::mem::size_of::<Vertex>()) as u64;
                let padded_index_count = self.frame_indices.len() + self.frame_indices.len() % 2;
                let index_buffer_slice_size = (padded_index_count * std::mem::size_of::<u16>()) as u64;

                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..vertex_buffer_slice_size));
                render_pass.set_index_buffer(self.index_buffer.slice(..index_buffer_slice_size), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..self.frame_indices.len() as u32, 0, 0..1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_room_is_centered_right_of_the_panel() {
        let room = RoomRectangle::new(10.0, 10.0).unwrap();
        let viewport = FloorViewport::fit(&room, 1300.0, 880.0, 300.0);
        assert_eq!(viewport.scale, 80.0);
        assert_eq!(viewport.to_screen(&Point2::new(0.0, 0.0)), Point2::new(400.0, 40.0));
        assert_eq!(viewport.to_screen(&Point2::new(10.0, 10.0)), Point2::new(1200.0, 840.0));
    }

    #[test]
    fn wide_room_is_limited_by_width() {
        let room = RoomRectangle::new(20.0, 5.0).unwrap();
        let viewport = FloorViewport::fit(&room, 880.0, 880.0, 0.0);
        assert_eq!(viewport.scale, 40.0);
        assert_eq!(viewport.origin_x, 40.0);
        assert_eq!(viewport.origin_y, 340.0);
    }

    #[test]
    fn mapping_keeps_polygons_counter_clockwise() {
        let room = RoomRectangle::new(8.0, 6.0).unwrap();
        let viewport = FloorViewport::fit(&room, 1024.0, 768.0, 320.0);
        let on_screen = viewport.polygon_to_screen(&room.polygon());
        assert!(on_screen.is_convex_ccw());
        assert!(on_screen.signed_area() > 0.0);
    }
}
