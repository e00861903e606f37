use std::mem::size_of;

use bytemuck::{bytes_of, cast_slice, Pod, Zeroable};
use glam::{vec4, Mat4, Vec4};
use wgpu::util::DeviceExt;

use crate::{
    assets::SceneAssets,
    geometry::{self, Vertex},
    scene::{
        SceneState, MOON_RADIUS, PROFILE_CUBE_SIZE, TORUS_COLOR, TORUS_MAJOR_RADIUS,
        TORUS_TUBE_RADIUS, VENUS_RADIUS,
    },
};

use super::texture::{create_image_texture, NEUTRAL_NORMAL, WHITE};

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
struct BodyUniforms {
    model: Mat4,
    view_proj: Mat4,
    base_color: Vec4,
    // xyz: light position, w: intensity.
    light_position: Vec4,
    // x: unlit, y: has color map, z: has normal map.
    flags: Vec4,
}

#[derive(Debug, Copy, Clone)]
enum BodyKind {
    Torus,
    ProfileCube,
    Moon,
    Venus,
}

struct GpuBody {
    kind: BodyKind,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    base_color: Vec4,
    flags: Vec4,
}

/// Draws the four named bodies: torus (lit, flat color), profile cube (unlit,
/// textured), moon and venus (lit, color + normal maps).
pub struct BodyPass {
    render_pipeline: wgpu::RenderPipeline,
    bodies: Vec<GpuBody>,
}

impl BodyPass {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        assets: &SceneAssets,
    ) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Body Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        // The profile cube keeps its pixelated look when magnified.
        let nearest_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Body Nearest Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size_of::<BodyUniforms>() as _),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });

        let render_pipeline = {
            let shader_module = device.create_shader_module(&wgpu::include_wgsl!(
                "../shaders/body.wgsl"
            ));

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: None,
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Body Render Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader_module,
                    entry_point: "vs_main",
                    buffers: &[vertex_buffer_layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader_module,
                    entry_point: "fs_main",
                    targets: &[surface_format.into()],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(super::depth_stencil_state(true)),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        };

        let white = create_image_texture(
            device,
            queue,
            None,
            WHITE,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            "White Fallback Texture",
        );
        let flat_normal = create_image_texture(
            device,
            queue,
            None,
            NEUTRAL_NORMAL,
            wgpu::TextureFormat::Rgba8Unorm,
            "Flat Normal Fallback Texture",
        );

        let make_body = |kind: BodyKind,
                             mesh: &geometry::Mesh,
                             base_color: Vec4,
                             flags: Vec4,
                             sampler: &wgpu::Sampler,
                             color_map: &wgpu::TextureView,
                             normal_map: &wgpu::TextureView| {
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Body Vertex Buffer"),
                contents: cast_slice(mesh.vertices.as_slice()),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Body Index Buffer"),
                contents: cast_slice(mesh.indices.as_slice()),
                usage: wgpu::BufferUsages::INDEX,
            });
            let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Body Uniform Buffer"),
                size: size_of::<BodyUniforms>() as _,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: None,
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(color_map),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(normal_map),
                    },
                ],
            });

            GpuBody {
                kind,
                vertex_buffer,
                index_buffer,
                index_count: mesh.index_count(),
                uniform_buffer,
                bind_group,
                base_color,
                flags,
            }
        };

        let profile_map = create_image_texture(
            device,
            queue,
            assets.profile.image(),
            WHITE,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            "Profile Texture",
        );
        let moon_map = create_image_texture(
            device,
            queue,
            assets.moon.image(),
            WHITE,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            "Moon Texture",
        );
        let moon_normal_map = create_image_texture(
            device,
            queue,
            assets.moon_normal.image(),
            NEUTRAL_NORMAL,
            wgpu::TextureFormat::Rgba8Unorm,
            "Moon Normal Texture",
        );
        let venus_map = create_image_texture(
            device,
            queue,
            assets.venus.image(),
            WHITE,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            "Venus Texture",
        );
        let venus_normal_map = create_image_texture(
            device,
            queue,
            assets.venus_normal.image(),
            NEUTRAL_NORMAL,
            wgpu::TextureFormat::Rgba8Unorm,
            "Venus Normal Texture",
        );

        let torus_mesh = geometry::torus(TORUS_MAJOR_RADIUS, TORUS_TUBE_RADIUS, 16, 100);
        let cube_mesh = geometry::cube(PROFILE_CUBE_SIZE);
        let moon_mesh = geometry::uv_sphere(MOON_RADIUS, 32, 32);
        let venus_mesh = geometry::uv_sphere(VENUS_RADIUS, 32, 32);

        let bodies = vec![
            make_body(
                BodyKind::Torus,
                &torus_mesh,
                vec4(TORUS_COLOR[0], TORUS_COLOR[1], TORUS_COLOR[2], 1.0),
                vec4(0.0, 0.0, 0.0, 0.0),
                &sampler,
                &white,
                &flat_normal,
            ),
            make_body(
                BodyKind::ProfileCube,
                &cube_mesh,
                Vec4::ONE,
                vec4(1.0, flag(assets.profile.is_loaded()), 0.0, 0.0),
                &nearest_sampler,
                &profile_map,
                &flat_normal,
            ),
            make_body(
                BodyKind::Moon,
                &moon_mesh,
                Vec4::ONE,
                vec4(
                    0.0,
                    flag(assets.moon.is_loaded()),
                    flag(assets.moon_normal.is_loaded()),
                    0.0,
                ),
                &sampler,
                &moon_map,
                &moon_normal_map,
            ),
            make_body(
                BodyKind::Venus,
                &venus_mesh,
                Vec4::ONE,
                vec4(
                    0.0,
                    flag(assets.venus.is_loaded()),
                    flag(assets.venus_normal.is_loaded()),
                    0.0,
                ),
                &sampler,
                &venus_map,
                &venus_normal_map,
            ),
        ];

        Self {
            render_pipeline,
            bodies,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, scene: &SceneState, aspect_ratio: f32) {
        let view_proj = scene.camera.view_projection(aspect_ratio);
        let light_position: Vec4 = (scene.light.position, scene.light.intensity).into();

        for body in &self.bodies {
            let transform = match body.kind {
                BodyKind::Torus => &scene.torus,
                BodyKind::ProfileCube => &scene.profile_cube,
                BodyKind::Moon => &scene.moon,
                BodyKind::Venus => &scene.venus,
            };
            let uniforms = BodyUniforms {
                model: transform.matrix(),
                view_proj,
                base_color: body.base_color,
                light_position,
                flags: body.flags,
            };
            queue.write_buffer(&body.uniform_buffer, 0, bytes_of(&uniforms));
        }
    }

    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.render_pipeline);
        for body in &self.bodies {
            render_pass.set_bind_group(0, &body.bind_group, &[]);
            render_pass.set_vertex_buffer(0, body.vertex_buffer.slice(..));
            render_pass.set_index_buffer(body.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..body.index_count, 0, 0..1);
        }
    }
}

fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}

pub(super) const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x3,
    3 => Float32x2,
];

pub(super) fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<Vertex>() as _,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}
