//! WebGPU starfield pipeline
//!
//! Two pipelines share one globals uniform: instanced star quads blended
//! additively, then ship and planet wireframes as alpha-blended line lists.

use bytemuck::{Pod, Zeroable};

use super::shapes;
use super::vertex::{LineVertex, StarInstance, colors};
use crate::error::{Result, WarpError};
use crate::sim::Scene;

/// Stars fade in over this many units after spawning at the far plane
const FAR_FADE_DEPTH: f32 = 20.0;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4], // offset 0
    resolution: [f32; 2],     // offset 64
    intensity: f32,           // offset 72
    time: f32,                // offset 76
}

/// Per-instance star data for the current frame
pub fn star_instances(scene: &Scene) -> Vec<StarInstance> {
    let field = scene.field();
    let far = field.bounds().far;
    let size = scene.star_size();
    field
        .stars()
        .iter()
        .map(|star| {
            let fade = ((star.pos.z - far) / FAR_FADE_DEPTH).clamp(0.0, 1.0);
            StarInstance {
                head: star.pos.to_array(),
                size,
                tail: star.tail().to_array(),
                alpha: colors::STAR_ALPHA * fade,
            }
        })
        .collect()
}

/// Ship and planet wireframes for the current frame
pub fn line_vertices(scene: &Scene) -> Vec<LineVertex> {
    let mut out = Vec::new();
    if let Some(planet) = scene.planet() {
        shapes::planet_lines(&mut out, planet);
    }
    if let Some(ships) = scene.ships() {
        for ship in ships.ships() {
            shapes::ship_lines(&mut out, ship);
        }
    }
    out
}

// ============================================================================
// STARFIELD RENDERER
// ============================================================================

pub struct StarfieldRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,

    star_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    star_buffer: wgpu::Buffer,
    star_capacity: usize,
    line_buffer: wgpu::Buffer,
    line_capacity: usize,

    pub size: (u32, u32),
    start_time: f64,
}

impl StarfieldRenderer {
    /// Create a renderer on a canvas, preferring WebGPU and falling back to WebGL2
    #[cfg(target_arch = "wasm32")]
    pub async fn for_canvas(canvas: web_sys::HtmlCanvasElement, size: (u32, u32)) -> Result<Self> {
        let has_webgpu = web_sys::window()
            .and_then(|w| {
                js_sys::Reflect::has(&w.navigator(), &wasm_bindgen::JsValue::from_str("gpu")).ok()
            })
            .unwrap_or(false);
        let candidates: &[wgpu::Backends] = if has_webgpu {
            &[wgpu::Backends::BROWSER_WEBGPU, wgpu::Backends::GL]
        } else {
            &[wgpu::Backends::GL]
        };

        let mut last_error = WarpError::Adapter("no backend tried".into());
        for &backends in candidates {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends,
                ..Default::default()
            });
            let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
                Ok(surface) => surface,
                Err(e) => {
                    last_error = WarpError::Surface(e.to_string());
                    continue;
                }
            };
            let adapter = match instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
            {
                Ok(adapter) => adapter,
                Err(e) => {
                    log::warn!("No adapter for {:?}: {}", backends, e);
                    last_error = WarpError::Adapter(e.to_string());
                    continue;
                }
            };
            log::info!("Using adapter: {:?} ({:?})", adapter.get_info().name, backends);
            return Self::new(surface, &adapter, size.0, size.1).await;
        }
        Err(last_error)
    }

    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("starfield-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| WarpError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| WarpError::Surface("surface reports no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        log::debug!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("starfield_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("starfield.wgsl").into()),
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("starfield_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("starfield_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("starfield_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let star_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("star_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_star"),
                buffers: &[StarInstance::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_star"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(additive),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
                buffers: &[LineVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_line"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let star_buffer = Self::instance_buffer(&device, "stars", std::mem::size_of::<StarInstance>(), 1);
        let line_buffer = Self::instance_buffer(&device, "lines", std::mem::size_of::<LineVertex>(), 1);

        log::info!("Starfield renderer ready ({}x{})", config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            star_pipeline,
            line_pipeline,
            globals_buffer,
            bind_group,
            star_buffer,
            star_capacity: 1,
            line_buffer,
            line_capacity: 1,
            size: (width, height),
            start_time: 0.0,
        })
    }

    fn instance_buffer(device: &wgpu::Device, label: &str, stride: usize, count: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (stride * count.max(1)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Upload the scene and draw one frame
    pub fn render(
        &mut self,
        scene: &Scene,
        intensity: f32,
        time: f64,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let globals = Globals {
            view_proj: scene.camera().view_proj().to_cols_array_2d(),
            resolution: [self.size.0 as f32, self.size.1 as f32],
            intensity,
            time: ((time - self.start_time) / 1000.0) as f32,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let stars = star_instances(scene);
        if stars.len() > self.star_capacity {
            self.star_capacity = stars.len();
            self.star_buffer = Self::instance_buffer(
                &self.device,
                "stars",
                std::mem::size_of::<StarInstance>(),
                self.star_capacity,
            );
        }
        if !stars.is_empty() {
            self.queue
                .write_buffer(&self.star_buffer, 0, bytemuck::cast_slice(&stars));
        }

        let lines = line_vertices(scene);
        if lines.len() > self.line_capacity {
            self.line_capacity = lines.len();
            self.line_buffer = Self::instance_buffer(
                &self.device,
                "lines",
                std::mem::size_of::<LineVertex>(),
                self.line_capacity,
            );
        }
        if !lines.is_empty() {
            self.queue
                .write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&lines));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("starfield_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("starfield_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_bind_group(0, &self.bind_group, &[]);

            if !stars.is_empty() {
                render_pass.set_pipeline(&self.star_pipeline);
                render_pass.set_vertex_buffer(0, self.star_buffer.slice(..));
                render_pass.draw(0..6, 0..stars.len() as u32);
            }

            if !lines.is_empty() {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                render_pass.draw(0..lines.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::{QualityPreset, Settings, StarStyle};
    use crate::sim::FrameInput;

    #[test]
    fn test_globals_layout() {
        assert_eq!(std::mem::size_of::<Globals>(), 80);
    }

    #[test]
    fn test_star_instances_track_scene() {
        let settings = Settings {
            star_style: StarStyle::Streaks,
            ..Settings::from_preset(QualityPreset::Low)
        };
        let mut scene = Scene::new(&settings, 1.0, 5);
        scene.step(&FrameInput {
            intensity: MAX_WARP_INTENSITY,
            ticks: 1.0,
            ..Default::default()
        });

        let instances = star_instances(&scene);
        assert_eq!(instances.len(), scene.field().len());
        for (inst, star) in instances.iter().zip(scene.field().stars()) {
            assert_eq!(inst.head, star.pos.to_array());
            assert!(inst.tail[2] <= inst.head[2]);
            assert!((0.0..=colors::STAR_ALPHA).contains(&inst.alpha));
            assert_eq!(inst.size, scene.star_size());
        }
    }

    #[test]
    fn test_low_quality_has_no_wireframes() {
        let scene = Scene::new(&Settings::from_preset(QualityPreset::Low), 1.0, 5);
        assert!(line_vertices(&scene).is_empty());

        let scene = Scene::new(&Settings::from_preset(QualityPreset::High), 1.0, 5);
        assert!(!line_vertices(&scene).is_empty());
    }
}
