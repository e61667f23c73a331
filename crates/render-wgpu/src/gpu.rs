use crate::mesh::{MeshData, Vertex};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use lumen_assets::CubeMapImage;
use lumen_common::Transform;
use lumen_render::PerspectiveCamera;
use lumen_scene::{MaterialParams, Scene};
use wgpu::util::DeviceExt;

/// Sky, horizon and ground colours of the placeholder environment.
pub const FALLBACK_SKY: [[u8; 3]; 3] = [[110, 150, 210], [205, 200, 195], [45, 40, 38]];

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    light_pos: [f32; 4],
    light_color: [f32; 4],
}

impl Globals {
    pub(crate) fn new(scene: &Scene, camera: &PerspectiveCamera) -> Self {
        let ambient = scene.ambient_light();
        let light = scene.point_light();
        let premul = |c: [f32; 3], k: f32| [c[0] * k, c[1] * k, c[2] * k, 1.0];
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            ambient: premul(ambient.color.to_array(), ambient.intensity),
            light_pos: light.position.extend(1.0).to_array(),
            light_color: premul(light.color.to_array(), light.intensity),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct MaterialUniform {
    base_color: [f32; 4],
    params: [f32; 4],
}

impl MaterialUniform {
    pub(crate) fn new(params: &MaterialParams, env_mip_count: u32) -> Self {
        let [r, g, b] = params.color.to_array();
        Self {
            base_color: [r, g, b, 1.0],
            params: [
                params.metalness,
                params.roughness,
                params.env_map_intensity,
                env_mip_count as f32,
            ],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct ObjectUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

impl ObjectUniform {
    pub(crate) fn new(transform: &Transform) -> Self {
        let model = transform.model_matrix();
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
        }
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Draws the showcase objects with the shared material into a colour
/// target. Knows nothing about surfaces or windows.
pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    globals_layout: wgpu::BindGroupLayout,
    globals_buffer: wgpu::Buffer,
    material_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    env_mip_count: u32,
    meshes: Vec<GpuMesh>,
    depth_texture: wgpu::TextureView,
    target_format: wgpu::TextureFormat,
}

impl MeshRenderer {
    /// Upload the scene's meshes and a gradient environment with
    /// `fallback_size` pixel faces.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        scene: &Scene,
        (width, height): (u32, u32),
        fallback_size: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let material_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("material_buffer"),
            size: std::mem::size_of::<MaterialUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("standard_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("standard_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::STANDARD_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("standard_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // The plane is seen from both sides.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let meshes = scene
            .objects()
            .iter()
            .map(|object| {
                let mesh = MeshData::for_primitive(&object.primitive);
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_vertex_buffer", object.name)),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_index_buffer", object.name)),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_object_buffer", object.name)),
                    contents: bytemuck::bytes_of(&ObjectUniform::new(&object.transform)),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{}_bind_group", object.name)),
                    layout: &object_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });
                GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.indices.len() as u32,
                    uniform_buffer,
                    bind_group,
                }
            })
            .collect();

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("env_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let [sky, horizon, ground] = FALLBACK_SKY;
        let fallback = CubeMapImage::gradient(fallback_size, sky, horizon, ground);
        let (env_view, env_mip_count) = Self::upload_cube_map(device, queue, &fallback);
        let globals_bind_group = Self::create_globals_bind_group(
            device,
            &globals_layout,
            &globals_buffer,
            &material_buffer,
            &env_view,
            &sampler,
        );

        let depth_texture = Self::create_depth_texture(device, width, height);

        tracing::debug!("mesh renderer ready with {} objects", scene.objects().len());

        Self {
            pipeline,
            globals_layout,
            globals_buffer,
            material_buffer,
            globals_bind_group,
            sampler,
            env_mip_count,
            meshes,
            depth_texture,
            target_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    /// Replace the environment cube-map.
    pub fn set_environment(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        cube: &CubeMapImage,
    ) {
        let (view, mip_count) = Self::upload_cube_map(device, queue, cube);
        self.globals_bind_group = Self::create_globals_bind_group(
            device,
            &self.globals_layout,
            &self.globals_buffer,
            &self.material_buffer,
            &view,
            &self.sampler,
        );
        self.env_mip_count = mip_count;
        tracing::info!("environment map set ({}px, {mip_count} mips)", cube.size());
    }

    /// Draw one frame into `view`. Reads a snapshot of the material; never
    /// writes scene state.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) {
        queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&Globals::new(scene, camera)),
        );
        let material = scene.material().snapshot();
        queue.write_buffer(
            &self.material_buffer,
            0,
            bytemuck::bytes_of(&MaterialUniform::new(&material, self.env_mip_count)),
        );
        for (mesh, object) in self.meshes.iter().zip(scene.objects()) {
            queue.write_buffer(
                &mesh.uniform_buffer,
                0,
                bytemuck::bytes_of(&ObjectUniform::new(&object.transform)),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for mesh in &self.meshes {
                pass.set_bind_group(1, &mesh.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn upload_cube_map(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        cube: &CubeMapImage,
    ) -> (wgpu::TextureView, u32) {
        let chain = cube.mip_chain();
        let mip_count = chain.len() as u32;
        let size = cube.size().max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("env_cube_texture"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 6,
            },
            mip_level_count: mip_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, image) in chain.iter().enumerate() {
            let edge = image.size();
            for face in 0..6 {
                queue.write_texture(
                    wgpu::TexelCopyTextureInfo {
                        texture: &texture,
                        mip_level: level as u32,
                        origin: wgpu::Origin3d {
                            x: 0,
                            y: 0,
                            z: face as u32,
                        },
                        aspect: wgpu::TextureAspect::All,
                    },
                    image.face(face),
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(4 * edge),
                        rows_per_image: Some(edge),
                    },
                    wgpu::Extent3d {
                        width: edge,
                        height: edge,
                        depth_or_array_layers: 1,
                    },
                );
            }
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("env_cube_view"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        (view, mip_count)
    }

    fn create_globals_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        globals: &wgpu::Buffer,
        material: &wgpu::Buffer,
        env_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: material.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(env_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};
    use lumen_common::EulerRotation;

    #[test]
    fn uniform_sizes_match_shader_layout() {
        assert_eq!(std::mem::size_of::<Globals>(), 128);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 32);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 128);
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn material_uniform_packs_params() {
        let params = MaterialParams::default();
        let u = MaterialUniform::new(&params, 7);
        assert_eq!(u.base_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(u.params, [0.7, 0.2, 1.0, 7.0]);
    }

    #[test]
    fn globals_carry_lights_and_camera() {
        let scene = Scene::default();
        let camera = PerspectiveCamera::default();
        let g = Globals::new(&scene, &camera);
        assert_eq!(g.light_pos, [2.0, 3.0, 4.0, 1.0]);
        assert_eq!(g.ambient, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(g.camera_pos, [1.0, 1.0, 2.0, 1.0]);
        let pink = lumen_common::Rgb::from_hex(0xFFC0CB);
        assert_eq!(g.light_color, [pink.r, pink.g, pink.b, 1.0]);
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular() {
        let transform = Transform {
            position: Vec3::new(1.5, 0.0, 0.0),
            rotation: EulerRotation {
                x: 0.3,
                y: 1.1,
                z: 0.0,
            },
            scale: Vec3::new(2.0, 1.0, 0.5),
        };
        let u = ObjectUniform::new(&transform);
        let model = Mat4::from_cols_array_2d(&u.model);
        let normal = Mat4::from_cols_array_2d(&u.normal);

        let tangent = Vec3::X;
        let n = Vec3::Y;
        let t_world = (model * Vec4::from((tangent, 0.0))).truncate();
        let n_world = (normal * Vec4::from((n, 0.0))).truncate();
        assert!(t_world.dot(n_world).abs() < 1e-5);
    }
}
