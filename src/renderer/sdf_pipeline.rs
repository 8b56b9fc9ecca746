//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in fragment shader using signed distance fields.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::consts::*;
use crate::sim::Snapshot;

/// Maximum number of obstacles uploaded per frame
const MAX_OBSTACLES: usize = 32;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2], // offset 0 - canvas pixels
    viewport: [f32; 2],   // offset 8 - game units
    time: f32,            // offset 16
    ground_height: f32,   // offset 20
    gap: f32,             // offset 24
    obstacle_count: u32,  // offset 28
    game_over: u32,       // offset 32
    avatar_rotation: f32, // offset 36
    _pad: [u32; 2],       // offset 40 - align avatar to 16 bytes
    avatar: [f32; 4],     // offset 48 - x, y, w, h
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ObstacleData {
    x: f32,
    width: f32,
    top_height: f32,
    scored: u32,
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    obstacles_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    start_time: f64,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!("Surface config: {}x{}", width, height);
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                viewport: [VIEWPORT_MAX_WIDTH, VIEWPORT_HEIGHT],
                time: 0.0,
                ground_height: GROUND_HEIGHT,
                gap: OBSTACLE_GAP,
                obstacle_count: 0,
                game_over: 0,
                avatar_rotation: 0.0,
                _pad: [0; 2],
                avatar: [AVATAR_X, AVATAR_START_Y, AVATAR_SIZE, AVATAR_SIZE],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let obstacles_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("obstacles"),
            size: (std::mem::size_of::<ObstacleData>() * MAX_OBSTACLES) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
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
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: obstacles_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
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

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            obstacles_buffer,
            bind_group,
            size: (width, height),
            start_time: 0.0,
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

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Upload the snapshot and draw one frame
    pub fn render(&mut self, snapshot: &Snapshot<'_>, time: f64) -> Result<(), wgpu::SurfaceError> {
        // time is ms from requestAnimationFrame, convert to seconds
        let elapsed = ((time - self.start_time).max(0.0) / 1000.0) as f32;

        let globals = globals_for(snapshot, self.size, elapsed);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let obstacles_data = obstacle_data(snapshot);
        self.queue.write_buffer(
            &self.obstacles_buffer,
            0,
            bytemuck::cast_slice(&obstacles_data),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn globals_for(snapshot: &Snapshot<'_>, size: (u32, u32), elapsed: f32) -> Globals {
    let avatar = snapshot.avatar;
    Globals {
        resolution: [size.0 as f32, size.1 as f32],
        viewport: [snapshot.viewport.width, snapshot.viewport.height],
        time: elapsed,
        ground_height: snapshot.ground_height,
        gap: snapshot.gap,
        obstacle_count: snapshot.obstacles.len().min(MAX_OBSTACLES) as u32,
        game_over: u32::from(snapshot.is_over()),
        avatar_rotation: avatar.rotation,
        _pad: [0; 2],
        avatar: [avatar.pos.x, avatar.pos.y, avatar.size.x, avatar.size.y],
    }
}

/// Fixed-size upload; slots past `obstacle_count` are zeroed
fn obstacle_data(snapshot: &Snapshot<'_>) -> Vec<ObstacleData> {
    let mut data = vec![ObstacleData::zeroed(); MAX_OBSTACLES];
    for (slot, obstacle) in data.iter_mut().zip(snapshot.obstacles) {
        *slot = ObstacleData {
            x: obstacle.x,
            width: obstacle.width,
            top_height: obstacle.top_height,
            scored: u32::from(obstacle.scored),
        };
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Simulation, Viewport};
    use crate::tuning::Tuning;

    #[test]
    fn test_gpu_struct_layout() {
        assert_eq!(std::mem::size_of::<Globals>(), 64);
        assert_eq!(std::mem::size_of::<ObstacleData>(), 16);
    }

    #[test]
    fn test_upload_from_snapshot() {
        let mut sim = Simulation::new(Tuning::default(), Viewport::new(640.0, 600.0), 1);
        sim.start(0.0);
        let snap = sim.snapshot();

        let globals = globals_for(&snap, (1280, 1200), 1.5);
        assert_eq!(globals.viewport, [640.0, 600.0]);
        assert_eq!(globals.obstacle_count, 1);
        assert_eq!(globals.game_over, 0);
        assert_eq!(globals.avatar, [100.0, 300.0, 50.0, 50.0]);

        let data = obstacle_data(&snap);
        assert_eq!(data.len(), MAX_OBSTACLES);
        assert_eq!(data[0].x, 640.0);
        assert_eq!(data[0].top_height, sim.obstacles()[0].top_height);
        assert_eq!(data[1].width, 0.0);
    }
}
