use std::sync::Arc;

use bytemuck::Zeroable;
use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::loaders::ModelMesh;
use crate::scene::{self, HeroScene, ModelSlot};
use crate::update::Backdrop;

use super::context::GpuContext;
use super::mesh::{self, GpuMesh, MeshData, Vertex};
use super::texture::{SpriteTexture, TextureData};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// === GPU Data Structures ===

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct LightUniform {
    position: [f32; 4],
    color: [f32; 4],
}

/// Per-frame uniform shared by all three pipelines. Layout mirrors
/// `FrameUniform` in backdrop.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniform {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    fog_color: [f32; 4],
    fog_params: [f32; 4],
    ambient: [f32; 4],
    lights: [LightUniform; 3],
    counts: [u32; 4],
}

/// Per-entity instance attributes, rewritten from scene state every frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
}

impl InstanceData {
    const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        3 => Float32x4, 4 => Float32x4, 5 => Float32x4,
        6 => Float32x4, 7 => Float32x4, 8 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn new(model: Mat4, color: [f32; 4], emissive: Vec3) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            emissive: [emissive.x, emissive.y, emissive.z, 0.0],
        }
    }
}

const STAR_CORNERS: [[f32; 2]; 6] = [
    [-0.5, -0.5],
    [0.5, -0.5],
    [-0.5, 0.5],
    [-0.5, 0.5],
    [0.5, -0.5],
    [0.5, 0.5],
];

fn star_corner_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

fn star_center_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRIBUTES,
    }
}

/// Uploaded model part plus the material values its instance carries.
struct ModelPartEntry {
    mesh: GpuMesh,
    color: [f32; 4],
    emissive: Vec3,
}

/// egui FPS overlay state.
struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

// === Renderer ===

/// Owns the surface, pipelines and geometry, and draws one frame from
/// whatever the backdrop state currently is.
pub struct SceneRenderer {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,

    lit_pipeline: wgpu::RenderPipeline,
    sprite_pipeline: wgpu::RenderPipeline,
    star_pipeline: wgpu::RenderPipeline,

    bead_mesh: GpuMesh,
    particle_mesh: GpuMesh,
    ring_mesh: GpuMesh,
    avatar_mesh: GpuMesh,
    rocket_mesh: GpuMesh,
    model_parts: Vec<ModelPartEntry>,

    star_corner_buffer: wgpu::Buffer,
    star_center_buffer: wgpu::Buffer,
    star_count: u32,

    ring_texture: SpriteTexture,
    avatar_texture: SpriteTexture,
    rocket_texture: SpriteTexture,

    overlay: Option<Overlay>,
}

impl SceneRenderer {
    pub async fn new(window: Arc<Window>, scene: &HeroScene, with_overlay: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let gpu = GpuContext::new(&instance, &surface).await?;

        let surface_config = Self::create_surface_config(&surface, gpu.adapter(), size);
        surface.configure(gpu.device(), &surface_config);
        let depth_view = Self::create_depth_texture(gpu.device(), &surface_config);

        let device = gpu.device();

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform"),
            contents: bytemuck::cast_slice(&[FrameUniform::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
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
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let sprite_layout = SpriteTexture::bind_group_layout(device);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Backdrop Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("backdrop.wgsl").into()),
        });

        let (lit_pipeline, sprite_pipeline, star_pipeline) = Self::create_pipelines(
            device,
            &shader,
            &frame_layout,
            &sprite_layout,
            surface_config.format,
        );

        let bead_mesh = GpuMesh::upload(
            device,
            &mesh::sphere(scene::BEAD_RADIUS, 16, 16),
            "Bead Mesh",
        );
        let particle_mesh = GpuMesh::upload(
            device,
            &mesh::tetrahedron(scene::PARTICLE_RADIUS),
            "Particle Mesh",
        );
        let ring_mesh = GpuMesh::upload(
            device,
            &mesh::annulus(scene::RING_INNER_RADIUS, scene::RING_OUTER_RADIUS, 64),
            "Ring Mesh",
        );
        let avatar_mesh = GpuMesh::upload(device, &mesh::circle(scene::AVATAR_RADIUS, 64), "Avatar Mesh");
        let rocket_mesh = GpuMesh::upload(
            device,
            &mesh::plane(scene::ROCKET_WIDTH, scene::ROCKET_HEIGHT),
            "Rocket Mesh",
        );

        let star_corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Star Corners"),
            contents: bytemuck::cast_slice(&STAR_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let star_centers: Vec<[f32; 3]> =
            scene.stars.positions.iter().map(|p| p.to_array()).collect();
        let star_center_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Star Centers"),
            contents: bytemuck::cast_slice(&star_centers),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let queue = gpu.queue();
        let ring_texture = SpriteTexture::upload(
            device,
            queue,
            &sprite_layout,
            &TextureData::solid([255, 255, 255, 255]),
            "Ring Texture",
        );
        let avatar_texture = SpriteTexture::upload(
            device,
            queue,
            &sprite_layout,
            &TextureData::avatar_sprite(),
            "Avatar Texture",
        );
        let rocket_texture = SpriteTexture::upload(
            device,
            queue,
            &sprite_layout,
            &TextureData::rocket_sprite(),
            "Rocket Texture",
        );

        let instance_capacity = scene.beads.len() + scene.particles.len() + 3;
        let instance_buffer = Self::create_instance_buffer(device, instance_capacity);

        let overlay = with_overlay.then(|| {
            let ctx = egui::Context::default();
            let state = egui_winit::State::new(
                ctx.clone(),
                egui::ViewportId::ROOT,
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            );
            let renderer =
                egui_wgpu::Renderer::new(device, surface_config.format, egui_wgpu::RendererOptions::default());
            Overlay {
                ctx,
                state,
                renderer,
            }
        });

        Ok(Self {
            gpu,
            surface,
            surface_config,
            depth_view,
            frame_buffer,
            frame_bind_group,
            instance_buffer,
            instance_capacity,
            lit_pipeline,
            sprite_pipeline,
            star_pipeline,
            bead_mesh,
            particle_mesh,
            ring_mesh,
            avatar_mesh,
            rocket_mesh,
            model_parts: Vec::new(),
            star_corner_buffer,
            star_center_buffer,
            star_count: scene.stars.positions.len() as u32,
            ring_texture,
            avatar_texture,
            rocket_texture,
            overlay,
        })
    }

    /// Reconfigure the surface and depth buffer for new dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface
            .configure(self.gpu.device(), &self.surface_config);
        self.depth_view = Self::create_depth_texture(self.gpu.device(), &self.surface_config);
    }

    /// Upload the loaded model's geometry. Called once, when the load
    /// delivers.
    pub fn upload_model(&mut self, model: &ModelMesh) {
        let device = self.gpu.device();
        self.model_parts = model
            .parts
            .iter()
            .map(|part| ModelPartEntry {
                mesh: GpuMesh::upload(device, &MeshData::from_model_part(part), "Model Part"),
                color: part.base_color,
                emissive: Vec3::from_array(part.emissive),
            })
            .collect();
        self.ensure_instance_capacity(self.instance_capacity + self.model_parts.len());
    }

    /// Forward a window event to the overlay. Returns true when consumed.
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        match &mut self.overlay {
            Some(overlay) => overlay.state.on_window_event(window, event).consumed,
            None => false,
        }
    }

    /// Draw one frame of the current backdrop state.
    pub fn render(
        &mut self,
        backdrop: &Backdrop,
        window: &Window,
        fps: f32,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let scene = &backdrop.scene;

        let frame_uniform = Self::build_frame_uniform(backdrop);
        self.gpu.queue().write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::cast_slice(&[frame_uniform]),
        );

        let instances = self.build_instances(scene);
        self.ensure_instance_capacity(instances.len());
        self.gpu
            .queue()
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.gpu
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Backdrop Encoder"),
                });

        {
            let background = scene.background;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backdrop Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background.x as f64,
                            g: background.y as f64,
                            b: background.z as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let bead_count = scene.beads.len() as u32;
            let particle_count = scene.particles.len() as u32;
            let model_drawn =
                matches!(scene.ufo, ModelSlot::Ready(_)) && !self.model_parts.is_empty();

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            // Opaque lit geometry first.
            pass.set_pipeline(&self.lit_pipeline);
            pass.set_vertex_buffer(0, self.bead_mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(
                self.bead_mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            pass.draw_indexed(0..self.bead_mesh.index_count, 0, 0..bead_count);

            pass.set_vertex_buffer(0, self.particle_mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(
                self.particle_mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            pass.draw_indexed(
                0..self.particle_mesh.index_count,
                0,
                bead_count..bead_count + particle_count,
            );

            let mut next_instance = bead_count + particle_count;
            if model_drawn {
                for part in &self.model_parts {
                    pass.set_vertex_buffer(0, part.mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(
                        part.mesh.index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    pass.draw_indexed(0..part.mesh.index_count, 0, next_instance..next_instance + 1);
                    next_instance += 1;
                }
            }

            // Stars share the depth buffer but not the instance buffer.
            pass.set_pipeline(&self.star_pipeline);
            pass.set_vertex_buffer(0, self.star_corner_buffer.slice(..));
            pass.set_vertex_buffer(1, self.star_center_buffer.slice(..));
            pass.draw(0..STAR_CORNERS.len() as u32, 0..self.star_count);

            // Alpha-blended sprites last, farthest from the camera first.
            pass.set_pipeline(&self.sprite_pipeline);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            for (mesh, texture) in [
                (&self.ring_mesh, &self.ring_texture),
                (&self.avatar_mesh, &self.avatar_texture),
                (&self.rocket_mesh, &self.rocket_texture),
            ] {
                pass.set_bind_group(1, &texture.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, next_instance..next_instance + 1);
                next_instance += 1;
            }
        }

        if self.overlay.is_some() {
            self.draw_overlay(&mut encoder, &view, window, fps);
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    // === Frame assembly ===

    fn build_frame_uniform(backdrop: &Backdrop) -> FrameUniform {
        let scene = &backdrop.scene;
        let camera = &backdrop.camera;

        let view = camera.view_matrix();
        let proj = camera.projection_matrix();

        let mut lights = [LightUniform::zeroed(); 3];
        let mut count = 0;
        for light in scene.lights.iter().cloned().chain(scene.ufo_light()) {
            lights[count] = LightUniform {
                position: [
                    light.position.x,
                    light.position.y,
                    light.position.z,
                    light.range,
                ],
                color: (light.color * light.intensity).extend(0.0).to_array(),
            };
            count += 1;
        }

        FrameUniform {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            view_proj: (proj * view).to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            fog_color: scene.background.extend(1.0).to_array(),
            fog_params: [scene.fog_near, scene.fog_far, scene.stars.size, 0.0],
            ambient: (scene.ambient_color * scene.ambient_intensity)
                .extend(0.0)
                .to_array(),
            lights,
            counts: [count as u32, 0, 0, 0],
        }
    }

    fn build_instances(&self, scene: &HeroScene) -> Vec<InstanceData> {
        let mut instances = Vec::with_capacity(
            scene.beads.len() + scene.particles.len() + self.model_parts.len() + 3,
        );

        let cyan = scene::hex_color(scene::CYAN);
        for bead in &scene.beads {
            instances.push(InstanceData::new(
                Mat4::from_rotation_translation(
                    Quat::from_rotation_y(bead.rotation_y),
                    bead.position,
                ),
                [cyan.x, cyan.y, cyan.z, 1.0],
                cyan * scene::BEAD_EMISSIVE_INTENSITY,
            ));
        }

        for particle in &scene.particles {
            instances.push(InstanceData::new(
                Mat4::from_translation(particle.position),
                [particle.color.x, particle.color.y, particle.color.z, 1.0],
                particle.emissive * scene::PARTICLE_EMISSIVE_INTENSITY,
            ));
        }

        if let ModelSlot::Ready(ufo) = &scene.ufo {
            if !self.model_parts.is_empty() {
                let transform = Mat4::from_scale_rotation_translation(
                    Vec3::splat(ufo.scale),
                    Quat::from_rotation_y(ufo.rotation_y),
                    ufo.position,
                );
                for part in &self.model_parts {
                    instances.push(InstanceData::new(transform, part.color, part.emissive));
                }
            }
        }

        let ring = &scene.ring;
        instances.push(InstanceData::new(
            Mat4::from_rotation_translation(Quat::from_rotation_z(ring.rotation_z), ring.position),
            [cyan.x, cyan.y, cyan.z, scene::RING_OPACITY],
            Vec3::ZERO,
        ));
        instances.push(InstanceData::new(
            Mat4::from_translation(scene.avatar.position),
            [1.0, 1.0, 1.0, 1.0],
            Vec3::ZERO,
        ));
        let rocket = &scene.rocket;
        instances.push(InstanceData::new(
            Mat4::from_rotation_translation(
                Quat::from_rotation_z(rocket.rotation_z),
                rocket.position,
            ),
            [1.0, 1.0, 1.0, 1.0],
            Vec3::ZERO,
        ));

        instances
    }

    fn ensure_instance_capacity(&mut self, needed: usize) {
        if needed > self.instance_capacity {
            self.instance_capacity = needed;
            self.instance_buffer = Self::create_instance_buffer(self.gpu.device(), needed);
        }
    }

    fn draw_overlay(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        window: &Window,
        fps: f32,
    ) {
        let Some(overlay) = &mut self.overlay else {
            return;
        };

        let raw_input = overlay.state.take_egui_input(window);
        let full_output = overlay.ctx.run(raw_input, |ctx| {
            egui::Window::new("FPS")
                .title_bar(false)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(format!("{:.0}", fps))
                            .size(48.0)
                            .color(egui::Color32::from_rgb(74, 158, 255)),
                    );
                    ui.label(
                        egui::RichText::new("FPS")
                            .size(12.0)
                            .color(egui::Color32::GRAY),
                    );
                });
        });

        overlay
            .state
            .handle_platform_output(window, full_output.platform_output);

        let tris = overlay
            .ctx
            .tessellate(full_output.shapes, overlay.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            overlay.renderer.update_texture(
                self.gpu.device(),
                self.gpu.queue(),
                *id,
                image_delta,
            );
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.surface_config.width, self.surface_config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        overlay.renderer.update_buffers(
            self.gpu.device(),
            self.gpu.queue(),
            encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // SAFETY: The render pass lifetime is actually tied to the encoder,
            // but egui-wgpu requires 'static. This is safe because we drop the
            // render pass before using the encoder again.
            let render_pass_static = unsafe {
                std::mem::transmute::<&mut wgpu::RenderPass<'_>, &mut wgpu::RenderPass<'static>>(
                    &mut render_pass,
                )
            };

            overlay
                .renderer
                .render(render_pass_static, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            overlay.renderer.free_texture(id);
        }
    }

    // === Setup helpers ===

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::SurfaceConfiguration {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (capacity * std::mem::size_of::<InstanceData>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_pipelines(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        frame_layout: &wgpu::BindGroupLayout,
        sprite_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> (
        wgpu::RenderPipeline,
        wgpu::RenderPipeline,
        wgpu::RenderPipeline,
    ) {
        let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lit Pipeline Layout"),
            bind_group_layouts: &[frame_layout],
            push_constant_ranges: &[],
        });
        let sprite_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[frame_layout, sprite_layout],
            push_constant_ranges: &[],
        });

        let depth_write = |write_enabled| {
            Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: write_enabled,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            })
        };

        let lit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Lit Pipeline"),
            layout: Some(&lit_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_mesh"),
                buffers: &[Vertex::layout(), InstanceData::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_mesh"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_write(true),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let sprite_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Pipeline"),
            layout: Some(&sprite_pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_sprite"),
                buffers: &[Vertex::layout(), InstanceData::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_sprite"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Sprites test depth but do not write it, so they blend over
            // each other in draw order.
            depth_stencil: depth_write(false),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let star_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Star Pipeline"),
            layout: Some(&lit_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_star"),
                buffers: &[star_corner_layout(), star_center_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_star"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_write(true),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (lit_pipeline, sprite_pipeline, star_pipeline)
    }
}
