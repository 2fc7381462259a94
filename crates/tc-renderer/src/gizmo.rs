//! Transform gizmo renderer
//!
//! Draws the visible gizmo and helper handles of a [`Gizmo`] on top of the
//! scene. Each distinct handle shape is tessellated once and kept on the GPU;
//! per frame every visible handle becomes one instance carrying its world
//! matrix and highlighted color.

use std::ops::Range;

use bytemuck::Zeroable;
use tc_controls::{Gizmo, HandleShape};
use wgpu::util::DeviceExt;

use crate::camera::CameraUniform;
use crate::constants::SAMPLE_COUNT;
use crate::geometry::{GizmoInstance, GizmoVertex, Primitive, tessellate};

/// Initial instance capacity of the instance buffer
const INITIAL_INSTANCE_CAPACITY: usize = 64;

// ============== CPU batch ==============

/// Consecutive instances sharing one shape
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRange {
    /// Index into [`GizmoBatch::shapes`]
    pub shape: usize,
    /// Instance range in [`GizmoBatch::instances`]
    pub instances: Range<u32>,
}

/// Instances of one gizmo frame, in handle table order
#[derive(Debug, Clone, Default)]
pub struct GizmoBatch {
    /// Distinct shapes referenced by `draws`
    pub shapes: Vec<HandleShape>,
    /// One instance per visible handle
    pub instances: Vec<GizmoInstance>,
    /// Draw calls covering `instances`
    pub draws: Vec<DrawRange>,
}

impl GizmoBatch {
    /// Collect every drawable handle of the gizmo's current mode
    pub fn from_gizmo(gizmo: &Gizmo) -> Self {
        let mut batch = Self::default();
        for handle in gizmo.drawables() {
            let shape = match batch.shapes.iter().position(|s| *s == handle.shape) {
                Some(index) => index,
                None => {
                    batch.shapes.push(handle.shape);
                    batch.shapes.len() - 1
                }
            };

            let index = batch.instances.len() as u32;
            batch.instances.push(GizmoInstance::new(
                handle.world_matrix(),
                handle.color,
                handle.opacity,
            ));

            match batch.draws.last_mut() {
                Some(draw) if draw.shape == shape => draw.instances.end = index + 1,
                _ => batch.draws.push(DrawRange {
                    shape,
                    instances: index..index + 1,
                }),
            }
        }
        batch
    }

    /// True when nothing would be drawn
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

// ============== GPU buffers ==============

/// Tessellated shape resident on the GPU
struct ShapeBuffers {
    shape: HandleShape,
    primitive: Primitive,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl ShapeBuffers {
    fn new(device: &wgpu::Device, shape: HandleShape) -> Self {
        let mesh = tessellate(&shape);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gizmo Shape Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gizmo Shape Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            shape,
            primitive: mesh.primitive,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Gizmo Instance Buffer"),
        size: (capacity * std::mem::size_of::<GizmoInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

// ============== Renderer ==============

/// Gizmo renderer
pub struct GizmoRenderer {
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    shapes: Vec<ShapeBuffers>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    /// Prepared draws as (shape buffer index, instance range)
    draws: Vec<(usize, Range<u32>)>,
}

impl GizmoRenderer {
    /// Create the gizmo pipelines for the given color and depth targets
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Gizmo Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/gizmo.wgsl").into()),
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gizmo Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Gizmo Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Gizmo Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Gizmo Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let create_pipeline = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[GizmoVertex::layout(), GizmoInstance::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: depth_format,
                    depth_write_enabled: false, // Gizmo always on top
                    depth_compare: wgpu::CompareFunction::Always,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: SAMPLE_COUNT,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
        };

        let triangle_pipeline =
            create_pipeline("Gizmo Triangle Pipeline", wgpu::PrimitiveTopology::TriangleList);
        let line_pipeline = create_pipeline("Gizmo Line Pipeline", wgpu::PrimitiveTopology::LineList);

        tracing::info!("Gizmo renderer created ({:?}, {:?})", format, depth_format);

        Self {
            triangle_pipeline,
            line_pipeline,
            camera_buffer,
            camera_bind_group,
            shapes: Vec::new(),
            instance_buffer: create_instance_buffer(device, INITIAL_INSTANCE_CAPACITY),
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            draws: Vec::new(),
        }
    }

    /// Number of shapes tessellated so far
    pub fn cached_shape_count(&self) -> usize {
        self.shapes.len()
    }

    fn shape_index(&mut self, device: &wgpu::Device, shape: &HandleShape) -> usize {
        if let Some(index) = self.shapes.iter().position(|s| s.shape == *shape) {
            return index;
        }
        self.shapes.push(ShapeBuffers::new(device, *shape));
        tracing::debug!("Tessellated gizmo shape {:?}", shape);
        self.shapes.len() - 1
    }

    /// Upload the camera and the gizmo's current handles
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, gizmo: &Gizmo) {
        let uniform = CameraUniform::from_camera(&gizmo.state().camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));

        let batch = GizmoBatch::from_gizmo(gizmo);
        let resident: Vec<usize> = batch
            .shapes
            .iter()
            .map(|shape| self.shape_index(device, shape))
            .collect();

        if batch.instances.len() > self.instance_capacity {
            self.instance_capacity = batch.instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
            tracing::debug!("Gizmo instance buffer grown to {}", self.instance_capacity);
        }
        if !batch.instances.is_empty() {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&batch.instances),
            );
        }

        self.draws = batch
            .draws
            .into_iter()
            .map(|draw| (resident[draw.shape], draw.instances))
            .collect();
    }

    /// Draw the last prepared frame
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.draws.is_empty() {
            return;
        }

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

        for (index, instances) in &self.draws {
            let shape = &self.shapes[*index];
            let pipeline = match shape.primitive {
                Primitive::Triangles => &self.triangle_pipeline,
                Primitive::Lines => &self.line_pipeline,
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_vertex_buffer(0, shape.vertex_buffer.slice(..));
            render_pass.set_index_buffer(shape.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..shape.index_count, 0, instances.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use tc_controls::{AppearanceConfig, Axis, Mode, SharedState};
    use tc_core::Camera;

    fn gizmo(mode: Mode, visible: bool) -> Gizmo {
        let mut camera = Camera::perspective(50.0, 1.0, 0.1, 1000.0);
        camera.look_at(Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO);
        let state = SharedState {
            visible,
            mode,
            camera_position: camera.position,
            camera_rotation: camera.rotation(),
            eye: camera.position.normalize(),
            ..SharedState::new(camera)
        };
        Gizmo::new(state, AppearanceConfig::default())
    }

    #[test]
    fn test_hidden_gizmo_batch_empty() {
        let batch = GizmoBatch::from_gizmo(&gizmo(Mode::Translate, false));
        assert!(batch.is_empty());
        assert!(batch.draws.is_empty());
        assert!(batch.shapes.is_empty());
    }

    #[test]
    fn test_one_instance_per_drawable() {
        for &mode in Mode::all() {
            let g = gizmo(mode, true);
            let batch = GizmoBatch::from_gizmo(&g);
            assert_eq!(batch.instances.len(), g.drawables().count());
            assert!(!batch.is_empty());
        }
    }

    #[test]
    fn test_draws_cover_instances_in_order() {
        let batch = GizmoBatch::from_gizmo(&gizmo(Mode::Scale, true));
        let mut next = 0;
        for draw in &batch.draws {
            assert_eq!(draw.instances.start, next);
            assert!(draw.instances.end > draw.instances.start);
            assert!(draw.shape < batch.shapes.len());
            next = draw.instances.end;
        }
        assert_eq!(next as usize, batch.instances.len());
    }

    #[test]
    fn test_shapes_deduplicated() {
        let batch = GizmoBatch::from_gizmo(&gizmo(Mode::Translate, true));
        for (i, a) in batch.shapes.iter().enumerate() {
            assert!(batch.shapes[i + 1..].iter().all(|b| b != a));
        }
        assert!(batch.shapes.len() < batch.instances.len());
    }

    #[test]
    fn test_instances_carry_highlight() {
        let mut g = gizmo(Mode::Translate, true);
        let mut state = *g.state();
        state.axis = Some(Axis::X);
        g.sync(&state);
        g.update();

        let batch = GizmoBatch::from_gizmo(&g);
        for (handle, instance) in g.drawables().zip(&batch.instances) {
            let [r, gr, b] = handle.color;
            assert_eq!(instance.color, [r, gr, b, handle.opacity]);
            assert_eq!(instance.transform, handle.world_matrix().to_cols_array_2d());
        }
    }
}
