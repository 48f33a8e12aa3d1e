use super::{
    CANVAS_SIZE,
    color::{Color, ParseColorError},
    tessellation::Canvas,
    types::{Point, Transform2D},
    render::RenderState,
};
use std::mem;
use wgpu::util::DeviceExt;
use thiserror::Error;
use log::{debug, info};

/// Collects the shapes drawn with a pen into triangle and line lists
#[derive(Clone, Debug, Default)]
pub struct PolygonRecorder {
    /// The current position of the pen
    pen: Point,
    /// The path traced since begin_fill, None when not filling
    path: Option<Vec<Point>>,
    /// The vertices of all recorded shapes
    vertices: Vec<Vertex>,
    /// Indices into vertices forming the triangles of the filled shapes
    fill_indices: Vec<u32>,
    /// Indices into vertices forming the line segments of the outlines
    outline_indices: Vec<u32>,
    /// The number of filled shapes
    polygon_count: usize,
}

impl PolygonRecorder {
    /// Retrieves the number of filled shapes recorded
    pub fn get_polygon_count(&self) -> usize {
        self.polygon_count
    }

    /// Retrieves the recorded vertices
    pub fn get_vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Retrieves the triangle list indices
    pub fn get_fill_indices(&self) -> &[u32] {
        &self.fill_indices
    }

    /// Retrieves the line list indices
    pub fn get_outline_indices(&self) -> &[u32] {
        &self.outline_indices
    }

    /// Adds a closed polygon with a single color
    ///
    /// # Parameters
    ///
    /// corners: The corners in order, the closing corner must not be repeated
    ///
    /// color: The fill color
    fn add_polygon(&mut self, corners: &[Point], color: &Color) {
        let base = self.vertices.len() as u32;
        let count = corners.len() as u32;

        self.vertices.extend(corners.iter().map(|corner| Vertex::new(corner, color)));
        self.fill_indices.extend(fan_indices(base, count));
        self.outline_indices.extend(loop_indices(base, count));
        self.polygon_count += 1;
    }
}

impl Canvas for PolygonRecorder {
    type Error = ParseColorError;

    fn move_to(&mut self, point: &Point) {
        self.pen = *point;
    }

    fn line_to(&mut self, point: &Point) {
        match &mut self.path {
            Some(path) => path.push(*point),
            None => {
                let base = self.vertices.len() as u32;
                self.vertices.push(Vertex::new(&self.pen, &Color::BLACK));
                self.vertices.push(Vertex::new(point, &Color::BLACK));
                self.outline_indices.extend([base, base + 1]);
            }
        }
        self.pen = *point;
    }

    fn begin_fill(&mut self) {
        self.path = Some(vec![self.pen]);
    }

    fn end_fill(&mut self, color: &str) -> Result<(), Self::Error> {
        let Some(mut path) = self.path.take() else {
            return Ok(());
        };
        let color = Color::from_hex(color)?;

        // A path returning to its start is closed implicitly
        if path.len() > 1 && path.first() == path.last() {
            path.pop();
        }
        if path.len() >= 3 {
            self.add_polygon(&path, &color);
        }

        Ok(())
    }
}

/// Indices splitting a convex polygon into a fan of triangles around its first corner
///
/// # Parameters
///
/// base: The index of the first corner
///
/// count: The number of corners
fn fan_indices(base: u32, count: u32) -> Vec<u32> {
    (1..count.saturating_sub(1))
        .flat_map(|i| [base, base + i, base + i + 1])
        .collect()
}

/// Indices of the line segments going around a polygon
///
/// # Parameters
///
/// base: The index of the first corner
///
/// count: The number of corners
fn loop_indices(base: u32, count: u32) -> Vec<u32> {
    (0..count)
        .flat_map(|i| [base + i, base + (i + 1) % count])
        .collect()
}

/// A canvas recording into a PolygonRecorder which is drawn with wgpu.
///
/// Nothing reaches the gpu before flush is called, so a whole mosaic is uploaded at once.
pub struct GpuCanvas {
    /// The shapes drawn so far
    recorder: PolygonRecorder,
    /// The uploaded shapes, None until the first flush
    buffers: Option<Buffers>,
    /// The transformation matrix
    buffer_center_transform: wgpu::Buffer,
    /// The draw mode buffer
    buffer_draw_mode: wgpu::Buffer,
    /// The bind group for the center transform and the draw mode
    bind_group: wgpu::BindGroup,
    /// The render pipeline for filling
    pipeline_fill: wgpu::RenderPipeline,
    /// The render pipeline for the outline
    pipeline_outline: wgpu::RenderPipeline,
}

impl GpuCanvas {
    /// Creates an empty canvas
    ///
    /// # Parameters
    ///
    /// render_state: The render state to use for rendering
    pub fn new(render_state: &RenderState) -> Self {
        let device = render_state.get_device();

        // Create transform buffer
        let buffer_center_transform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Transform Buffer"),
            size: (mem::size_of::<f32>() * 4) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Create draw mode buffer
        let buffer_draw_mode = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Mode Buffer"),
            size: (mem::size_of::<u32>() * 4) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Create bind group for transform and mode
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bind Group Main Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bind Group Main"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer_center_transform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffer_draw_mode.as_entire_binding(),
                },
            ]
        });

        // Create shader
        let shader = device.create_shader_module(wgpu::include_wgsl!("shader.wgsl"));

        // Create render pipelines
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pipeline Layout Descriptor"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline_fill = Self::create_pipeline("Render Pipeline Fill", wgpu::PrimitiveTopology::TriangleList, &pipeline_layout, &shader, render_state);
        let pipeline_outline = Self::create_pipeline("Render Pipeline Outline", wgpu::PrimitiveTopology::LineList, &pipeline_layout, &shader, render_state);

        Self {
            recorder: PolygonRecorder::default(),
            buffers: None,
            buffer_center_transform,
            buffer_draw_mode,
            bind_group,
            pipeline_fill,
            pipeline_outline,
        }
    }

    /// Uploads everything drawn so far to the gpu
    ///
    /// # Parameters
    ///
    /// render_state: The render state to use for rendering
    pub fn flush(&mut self, render_state: &RenderState) {
        info!("Uploading {} polygons", self.recorder.get_polygon_count());
        self.buffers = Buffers::new(&self.recorder, render_state);
    }

    /// Draws the last flushed shapes on a white background and presents them
    ///
    /// # Parameters
    ///
    /// render_state: The render state to use for rendering
    ///
    /// # Errors
    ///
    /// See RenderError for the possible errors
    pub fn render(&self, render_state: &RenderState) -> Result<(), RenderError> {
        // Set the transform
        let size = render_state.get_size();
        let transform = Transform2D::fit_canvas(CANVAS_SIZE, size.width, size.height);
        render_state.get_queue().write_buffer(&self.buffer_center_transform, 0, bytemuck::cast_slice(&transform.get_data_center_transform()));

        // Get the current view
        let output_texture = render_state.get_surface().get_current_texture()?;
        let view = output_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Setup the load ops
        let background = Color::WHITE;
        let load_op_clear = wgpu::LoadOp::Clear(wgpu::Color {
            r: background.r as f64,
            g: background.g as f64,
            b: background.b as f64,
            a: background.a as f64,
        });
        let load_op_load = wgpu::LoadOp::Load;

        // Do the rendering
        self.render_single(DrawMode::Fill, load_op_clear, &view, render_state);
        self.render_single(DrawMode::Outline, load_op_load, &view, render_state);

        // Show to screen
        output_texture.present();

        Ok(())
    }

    fn render_single(&self, mode: DrawMode, load_op: wgpu::LoadOp<wgpu::Color>, view: &wgpu::TextureView, render_state: &RenderState) {
        // Create the encoder
        let mut encoder = render_state.get_device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Command Encoder"),
        });

        // Set the draw mode
        render_state.get_queue().write_buffer(&self.buffer_draw_mode, 0, bytemuck::cast_slice(&mode.get_data()));

        // Initialize the render pass
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                timestamp_writes: None,
                occlusion_query_set: None,
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: load_op,
                        store: wgpu::StoreOp::Store,
                    }
                })],
                depth_stencil_attachment: None,
            });

            if let Some(buffers) = &self.buffers {
                match mode {
                    DrawMode::Fill => render_pass.set_pipeline(&self.pipeline_fill),
                    DrawMode::Outline => render_pass.set_pipeline(&self.pipeline_outline),
                };
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                buffers.draw(mode, &mut render_pass);
            }
        }

        // Submit
        render_state.get_queue().submit(std::iter::once(encoder.finish()));
    }

    fn create_pipeline(label: &str, topology: wgpu::PrimitiveTopology, layout: &wgpu::PipelineLayout, shader: &wgpu::ShaderModule, render_state: &RenderState) -> wgpu::RenderPipeline {
        render_state.get_device().create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[
                    Vertex::desc(),
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: render_state.get_config().format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })]
            }),
            primitive: wgpu::PrimitiveState {
                topology,
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
        })
    }
}

impl Canvas for GpuCanvas {
    type Error = ParseColorError;

    fn move_to(&mut self, point: &Point) {
        self.recorder.move_to(point);
    }

    fn line_to(&mut self, point: &Point) {
        self.recorder.line_to(point);
    }

    fn begin_fill(&mut self) {
        self.recorder.begin_fill();
    }

    fn end_fill(&mut self, color: &str) -> Result<(), Self::Error> {
        self.recorder.end_fill(color)
    }
}

/// The gpu copy of a PolygonRecorder
struct Buffers {
    /// The vertices of all shapes
    vertices: wgpu::Buffer,
    /// The triangle indices, None if there is nothing to fill
    fill_indices: Option<(wgpu::Buffer, u32)>,
    /// The line indices, None if there is nothing to outline
    outline_indices: Option<(wgpu::Buffer, u32)>,
}

impl Buffers {
    /// Uploads the recorded shapes, returns None if nothing has been recorded
    ///
    /// # Parameters
    ///
    /// recorder: The shapes to upload
    ///
    /// render_state: The render state to use for rendering
    fn new(recorder: &PolygonRecorder, render_state: &RenderState) -> Option<Self> {
        if recorder.get_vertices().is_empty() {
            return None;
        }

        let device = render_state.get_device();
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Canvas Vertex Buffer"),
            contents: bytemuck::cast_slice(recorder.get_vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = |label: &str, indices: &[u32]| {
            if indices.is_empty() {
                return None;
            }
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            Some((buffer, indices.len() as u32))
        };
        let fill_indices = index_buffer("Canvas Fill Index Buffer", recorder.get_fill_indices());
        let outline_indices = index_buffer("Canvas Outline Index Buffer", recorder.get_outline_indices());
        debug!("Uploaded {} vertices", recorder.get_vertices().len());

        Some(Self {
            vertices,
            fill_indices,
            outline_indices,
        })
    }

    /// Draws the shapes with the currently set pipeline
    ///
    /// # Parameters
    ///
    /// mode: Decides which index buffer is used
    ///
    /// render_pass: The render pass to render with
    fn draw<'a>(&'a self, mode: DrawMode, render_pass: &mut wgpu::RenderPass<'a>) {
        let indices = match mode {
            DrawMode::Fill => &self.fill_indices,
            DrawMode::Outline => &self.outline_indices,
        };
        let Some((index_buffer, index_count)) = indices else {
            return;
        };

        render_pass.set_vertex_buffer(0, self.vertices.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..*index_count, 0, 0..1);
    }
}

/// Describes a colored vertex in canvas units
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// The position in the plane
    position: [f32; 2],
    /// The fill color
    color: [f32; 4],
}

impl Vertex {
    /// Creates a new vertex
    ///
    /// # Parameters
    ///
    /// point: The position
    ///
    /// color: The fill color
    fn new(point: &Point, color: &Color) -> Self {
        Self {
            position: point.get_data(),
            color: color.get_data(),
        }
    }

    /// Gets the memory description of a vertex
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ]
        }
    }
}

/// Describes if rendering should be done on the filling or outline of shapes
#[derive(Copy, Clone, Debug)]
enum DrawMode {
    Fill,
    Outline,
}

impl DrawMode {
    fn get_data(&self) -> [u32; 4] {
        match *self {
            Self::Fill => [0, 0, 0, 0],
            Self::Outline => [1, 0, 0, 0],
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum RenderError {
    #[error("Unable to get surface texture: {:?}", .0)]
    SurfaceTexture(wgpu::SurfaceError),
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(err: wgpu::SurfaceError) -> RenderError {
        RenderError::SurfaceTexture(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::ColorName,
        geometry::GridSpec,
        tessellation::{Composer, MosaicConfig, PlacementMode},
    };

    #[test]
    fn fan_covers_hexagon_with_four_triangles() {
        assert_eq!(fan_indices(10, 6), vec![10, 11, 12, 10, 12, 13, 10, 13, 14, 10, 14, 15]);
        assert!(fan_indices(0, 2).is_empty());
    }

    #[test]
    fn loop_returns_to_first_corner() {
        assert_eq!(loop_indices(3, 3), vec![3, 4, 4, 5, 5, 3]);
    }

    #[test]
    fn recorder_closes_filled_paths() {
        let mut recorder = PolygonRecorder::default();
        let square = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0), Point::new(0.0, 1.0)];

        recorder.move_to(&square[0]);
        recorder.begin_fill();
        for corner in &square[1..] {
            recorder.line_to(corner);
        }
        recorder.line_to(&square[0]);
        recorder.end_fill("#ff0000").unwrap();

        assert_eq!(recorder.get_polygon_count(), 1);
        assert_eq!(recorder.get_vertices().len(), 4);
        assert_eq!(recorder.get_fill_indices(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(recorder.get_outline_indices().len(), 8);
    }

    #[test]
    fn recorder_keeps_lines_outside_fills_as_outline() {
        let mut recorder = PolygonRecorder::default();
        recorder.move_to(&Point::new(0.0, 0.0));
        recorder.line_to(&Point::new(5.0, 5.0));

        assert_eq!(recorder.get_polygon_count(), 0);
        assert_eq!(recorder.get_vertices().len(), 2);
        assert!(recorder.get_fill_indices().is_empty());
        assert_eq!(recorder.get_outline_indices(), &[0, 1]);
    }

    #[test]
    fn recorder_rejects_bad_colors() {
        let mut recorder = PolygonRecorder::default();
        recorder.begin_fill();
        assert!(recorder.end_fill("red").is_err());
        assert_eq!(recorder.get_polygon_count(), 0);
    }

    #[test]
    fn recorder_takes_a_whole_mosaic() {
        let config = MosaicConfig {
            grid: GridSpec::new(4).unwrap(),
            first: ColorName::Red,
            second: ColorName::Blue,
            placement: PlacementMode::Alternating,
        };
        let mut recorder = PolygonRecorder::default();
        assert_eq!(Composer::with_config(config).draw(&mut recorder), Ok(16));

        assert_eq!(recorder.get_polygon_count(), 16);
        assert_eq!(recorder.get_vertices().len(), 16 * 6);
        assert_eq!(recorder.get_fill_indices().len(), 16 * 12);
        assert_eq!(recorder.get_outline_indices().len(), 16 * 12);
        assert_eq!(recorder.get_vertices()[0].color, Color::from_hex("#ff0000").unwrap().get_data());
        assert_eq!(recorder.get_vertices()[6].color, Color::from_hex("#0000ff").unwrap().get_data());
    }
}
