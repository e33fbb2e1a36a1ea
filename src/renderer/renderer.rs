use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::renderer::camera::CameraState;
use crate::renderer::line_vertex::LineVertex;
use crate::renderer::segments::{
    BALL_VERTEX_COUNT, SEGMENT_VERTEX_COUNT, ball_cross_vertices, segment_vertices,
};
use crate::rig::Rig;
use crate::settings::Settings;

/// Ground grid half-extent in world units.
const GRID_EXTENT: f32 = 16.0;
const GRID_MINOR_STEP: f32 = 0.5;
const GRID_MAJOR_STEP: f32 = 2.0;
const AXIS_LENGTH: f32 = 1.0;

pub struct Renderer {
    pub(crate) surface: wgpu::Surface<'static>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    pub(crate) config: wgpu::SurfaceConfiguration,
    pub(crate) segment_pipeline: wgpu::RenderPipeline,
    pub(crate) line_pipeline: wgpu::RenderPipeline,
    pub(crate) grid_vertex_buffer: wgpu::Buffer,
    pub(crate) num_grid_vertices: u32,
    pub(crate) segment_vertex_buffer: wgpu::Buffer,
    pub(crate) num_segment_vertices: u32,
    pub(crate) ball_vertex_buffer: wgpu::Buffer,
    pub(crate) num_ball_vertices: u32,
    pub(crate) camera_buffer: wgpu::Buffer,
    pub(crate) camera_bind_group: wgpu::BindGroup,
    segment_color: [f32; 3],
    ball_color: [f32; 3],
    grid_major_color: [f32; 3],
    grid_minor_color: [f32; 3],
    pub(crate) background_color: [f32; 3],
    pub camera: CameraState,
    pub(crate) egui_renderer: egui_wgpu::Renderer,
    egui_ctx: egui::Context,
}

impl Renderer {
    pub async fn new(window: Arc<winit::window::Window>) -> crate::error::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // The surface is the part of the window we draw to. Passing the Arc
        // by value ties the surface lifetime to the window handle.
        let surface = instance.create_surface(window)?;

        // Adapter is a handle to the GPU
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: wgpu::MemoryHints::default(),
                ..Default::default()
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shader.wgsl").into()),
        });

        // Create camera uniform buffer
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: 64, // mat4x4<f32>
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
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
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Both pipelines share the colored-vertex shader, no textures
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        // Solid triangles for the skeleton segments: opaque, depth tested
        let segment_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Segment Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
                buffers: &[LineVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_line"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        // Line rendering pipeline for the grid and the ball marker
        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
                buffers: &[LineVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_line"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: false, // Don't write to depth buffer so the marker stays visible
                depth_compare: wgpu::CompareFunction::Always, // Always pass depth test
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let grid_major_color = [0.2, 0.2, 0.2]; // Dark gray major grid
        let grid_minor_color = [0.4, 0.4, 0.4]; // Light gray minor grid

        let grid = grid_vertices(grid_minor_color, grid_major_color);
        let grid_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Vertex Buffer"),
            contents: bytemuck::cast_slice(&grid),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let num_grid_vertices = grid.len() as u32;

        // Pose geometry is rewritten every frame, so size the buffers once
        let segment_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Segment Vertex Buffer"),
            size: (SEGMENT_VERTEX_COUNT * std::mem::size_of::<LineVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let ball_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Ball Vertex Buffer"),
            size: (BALL_VERTEX_COUNT * std::mem::size_of::<LineVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, Default::default());

        log::info!(
            "renderer ready: {}x{}, {:?}",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            segment_pipeline,
            line_pipeline,
            grid_vertex_buffer,
            num_grid_vertices,
            segment_vertex_buffer,
            num_segment_vertices: 0,
            ball_vertex_buffer,
            num_ball_vertices: 0,
            camera_buffer,
            camera_bind_group,
            segment_color: [1.0, 0.5, 0.0],
            ball_color: [1.0, 1.0, 0.0],
            grid_major_color,
            grid_minor_color,
            background_color: [0.15, 0.15, 0.18],
            camera: CameraState::default(),
            egui_renderer,
            egui_ctx,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn egui_context(&self) -> egui::Context {
        self.egui_ctx.clone()
    }

    /// Rebuilds the pose geometry for the current frame. Segment quads face
    /// the camera, so this runs whenever the pose or the camera moves.
    pub fn update_pose(&mut self, rig: &Rig, ball_detected: bool) {
        let vertices = segment_vertices(rig, self.camera.eye(), self.segment_color);
        self.queue.write_buffer(
            &self.segment_vertex_buffer,
            0,
            bytemuck::cast_slice(&vertices),
        );
        self.num_segment_vertices = vertices.len() as u32;

        if ball_detected {
            let cross = ball_cross_vertices(rig.ball_world(), self.ball_color);
            self.queue
                .write_buffer(&self.ball_vertex_buffer, 0, bytemuck::cast_slice(&cross));
            self.num_ball_vertices = cross.len() as u32;
        } else {
            self.num_ball_vertices = 0;
        }
    }

    pub fn update_colors(&mut self, settings: &Settings) {
        self.segment_color = settings.colors.segment_color;
        self.ball_color = settings.colors.ball_color;
        self.background_color = settings.colors.background_color;

        // Update grid colors
        self.grid_major_color = settings.colors.grid_major_color;
        self.grid_minor_color = settings.colors.grid_minor_color;
        self.regenerate_grid();
    }

    /// Regenerate grid with current grid colors
    fn regenerate_grid(&mut self) {
        let grid = grid_vertices(self.grid_minor_color, self.grid_major_color);
        self.grid_vertex_buffer =
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Grid Vertex Buffer"),
                    contents: bytemuck::cast_slice(&grid),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        self.num_grid_vertices = grid.len() as u32;
    }
}

/// Ground-plane grid plus RGB world axes at the origin.
fn grid_vertices(minor_color: [f32; 3], major_color: [f32; 3]) -> Vec<LineVertex> {
    let mut vertices = Vec::new();

    // Axes - red X, green Y (up), blue Z
    vertices.push(LineVertex {
        position: [0.0, 0.0, 0.0],
        color: [1.0, 0.0, 0.0],
    });
    vertices.push(LineVertex {
        position: [AXIS_LENGTH, 0.0, 0.0],
        color: [1.0, 0.0, 0.0],
    });
    vertices.push(LineVertex {
        position: [0.0, 0.0, 0.0],
        color: [0.0, 1.0, 0.0],
    });
    vertices.push(LineVertex {
        position: [0.0, AXIS_LENGTH, 0.0],
        color: [0.0, 1.0, 0.0],
    });
    vertices.push(LineVertex {
        position: [0.0, 0.0, 0.0],
        color: [0.0, 0.0, 1.0],
    });
    vertices.push(LineVertex {
        position: [0.0, 0.0, AXIS_LENGTH],
        color: [0.0, 0.0, 1.0],
    });

    // Minor grid - XZ ground plane
    let minor_lines = (GRID_EXTENT / GRID_MINOR_STEP) as i32;
    for i in -minor_lines..=minor_lines {
        let pos = i as f32 * GRID_MINOR_STEP;
        vertices.push(LineVertex {
            position: [pos, 0.0, -GRID_EXTENT],
            color: minor_color,
        });
        vertices.push(LineVertex {
            position: [pos, 0.0, GRID_EXTENT],
            color: minor_color,
        });
        vertices.push(LineVertex {
            position: [-GRID_EXTENT, 0.0, pos],
            color: minor_color,
        });
        vertices.push(LineVertex {
            position: [GRID_EXTENT, 0.0, pos],
            color: minor_color,
        });
    }

    // Major grid - XZ ground plane
    let major_lines = (GRID_EXTENT / GRID_MAJOR_STEP) as i32;
    for i in -major_lines..=major_lines {
        let pos = i as f32 * GRID_MAJOR_STEP;
        vertices.push(LineVertex {
            position: [pos, 0.0, -GRID_EXTENT],
            color: major_color,
        });
        vertices.push(LineVertex {
            position: [pos, 0.0, GRID_EXTENT],
            color: major_color,
        });
        vertices.push(LineVertex {
            position: [-GRID_EXTENT, 0.0, pos],
            color: major_color,
        });
        vertices.push(LineVertex {
            position: [GRID_EXTENT, 0.0, pos],
            color: major_color,
        });
    }

    vertices
}
