use crate::camera::Camera;
use crate::canvas::{CanvasTransform, Uniforms};
use crate::config::LabConfig;
use crate::drawing::{DrawingContext, SegmentBatch};
use crate::state::{Canvas, GeometryBuffers, GpuContext, InputState};
use crate::turtle::{CommandLog, Turtle3d};
use crate::vertex::Vertex;
use std::sync::Arc;
use winit::dpi::PhysicalSize;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use web_time::Instant;
    } else {
        use std::time::Instant;
    }
}
use wgpu::util::DeviceExt;
use winit::window::Window;

pub struct State {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    pub gpu: GpuContext,
    pub canvas: Canvas,
    pub geometry: GeometryBuffers,
    pub input: InputState,

    pub config: LabConfig,
    pub lab: DrawingContext<SegmentBatch>,
    pub turtle: Turtle3d,
    pub home_camera: Camera,
    pub auto_rotate: bool,
    pub last_frame: Instant,
}

impl State {
    pub async fn new(window: Arc<Window>, config: LabConfig, program: CommandLog) -> State {
        let mut size = window.inner_size();

        #[cfg(target_arch = "wasm32")]
        {
            if size.width == 0 || size.height == 0 {
                size = winit::dpi::PhysicalSize::new(config.canvas.width, config.canvas.height);
            }
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .unwrap();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        let window_size = (size.width as f32, size.height as f32);
        let mut uniforms = Uniforms::new();
        let canvas_transform = CanvasTransform::new();
        uniforms.update_transform(&canvas_transform, window_size);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Canvas Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                label: Some("canvas_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("canvas_bind_group"),
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../data/shaders/line_shader.wgsl").into(),
            ),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Quad winding depends on segment direction.
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
            cache: None,
        });

        let gpu = GpuContext {
            surface,
            device,
            queue,
            config: surface_config,
            line_pipeline,
        };

        let canvas = Canvas {
            transform: canvas_transform,
            uniform: uniforms,
            uniform_buffer,
            uniform_bind_group,
        };

        let geometry = GeometryBuffers {
            vertex: None,
            index: None,
            count: 0,
        };

        let input = InputState {
            mouse_pos: [0.0; 2],
            modifiers: winit::keyboard::ModifiersState::empty(),
            pan_start: None,
        };

        // Validated when the config was loaded.
        let home_camera = config.camera().unwrap_or_else(|err| {
            log::warn!("{err}; using default camera");
            LabConfig::default()
                .camera()
                .expect("default camera is valid")
        });
        let lab = DrawingContext::new(
            home_camera.clone(),
            SegmentBatch::new(),
            window_size.0,
            window_size.1,
        );
        log::info!("Loaded turtle program with {} commands", program.len());

        Self {
            window,
            size,
            gpu,
            canvas,
            geometry,
            input,
            auto_rotate: config.viewer.auto_rotate,
            config,
            lab,
            turtle: Turtle3d::with_log(program),
            home_camera,
            last_frame: Instant::now(),
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn window_size(&self) -> (f32, f32) {
        (self.size.width as f32, self.size.height as f32)
    }
}
