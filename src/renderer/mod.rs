mod background_pass;
mod body_pass;
mod star_pass;
mod texture;

use anyhow::{Context, Result};
use log::warn;

use crate::{assets::SceneAssets, scene::SceneState};

use background_pass::BackgroundPass;
use body_pass::BodyPass;
use star_pass::StarPass;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

pub struct Renderer {
    surface: wgpu::Surface,
    surface_configuration: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
    depth_texture_view: wgpu::TextureView,
    background_pass: BackgroundPass,
    body_pass: BodyPass,
    star_pass: StarPass,
}

impl Renderer {
    pub async fn new(
        window: &winit::window::Window,
        scene: &SceneState,
        assets: &SceneAssets,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No adapter found")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("No device found")?;

        let surface_configuration = {
            let surface_format = surface
                .get_preferred_format(&adapter)
                .context("Surface is incompatible with the adapter")?;

            let winit::dpi::PhysicalSize { width, height } = window.inner_size();

            wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format: surface_format,
                width,
                height,
                present_mode: wgpu::PresentMode::Fifo,
            }
        };
        surface.configure(&device, &surface_configuration);

        let depth_texture_view = create_depth_texture_view(
            &device,
            surface_configuration.width,
            surface_configuration.height,
        );

        let background_pass =
            BackgroundPass::new(&device, &queue, surface_configuration.format, assets);
        let body_pass = BodyPass::new(&device, &queue, surface_configuration.format, assets);
        let star_pass = StarPass::new(&device, surface_configuration.format, scene);

        Ok(Self {
            surface,
            surface_configuration,
            device,
            queue,
            depth_texture_view,
            background_pass,
            body_pass,
            star_pass,
        })
    }

    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.surface_configuration.width = size.width;
        self.surface_configuration.height = size.height;
        self.surface.configure(&self.device, &self.surface_configuration);
        self.depth_texture_view =
            create_depth_texture_view(&self.device, size.width, size.height);
    }

    /// Recreates everything derived from scene content: star instances and
    /// body textures. Device, queue, and surface survive a reload.
    pub fn rebuild_scene(&mut self, scene: &SceneState, assets: &SceneAssets) {
        let format = self.surface_configuration.format;
        self.background_pass = BackgroundPass::new(&self.device, &self.queue, format, assets);
        self.body_pass = BodyPass::new(&self.device, &self.queue, format, assets);
        self.star_pass = StarPass::new(&self.device, format, scene);
    }

    pub fn render(&mut self, scene: &SceneState) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(error) => {
                warn!("Skipping frame: {}", error);
                return;
            }
        };
        let frame_view = frame.texture.create_view(&Default::default());

        let aspect_ratio =
            self.surface_configuration.width as f32 / self.surface_configuration.height as f32;
        self.body_pass.update(&self.queue, scene, aspect_ratio);
        self.star_pass.update(&self.queue, scene, aspect_ratio);

        let mut encoder = self.device.create_command_encoder(&Default::default());

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                }],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: false,
                    }),
                }),
            });
            self.background_pass.draw(&mut render_pass);
            self.body_pass.draw(&mut render_pass);
            self.star_pass.draw(&mut render_pass);
        }

        self.queue.submit(Some(encoder.finish()));

        frame.present();
    }

    /// Presents a plain black frame, used while a reload is pending.
    pub fn render_blank(&mut self) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(error) => {
                warn!("Skipping frame: {}", error);
                return;
            }
        };
        let frame_view = frame.texture.create_view(&Default::default());

        let mut encoder = self.device.create_command_encoder(&Default::default());
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[wgpu::RenderPassColorAttachment {
                view: &frame_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: true,
                },
            }],
            depth_stencil_attachment: None,
        });

        self.queue.submit(Some(encoder.finish()));

        frame.present();
    }
}

fn depth_stencil_state(depth_write_enabled: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled,
        depth_compare: if depth_write_enabled {
            wgpu::CompareFunction::LessEqual
        } else {
            wgpu::CompareFunction::Always
        },
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

fn create_depth_texture_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
