// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! wgpu device, pipelines, and static buffers for the viewer's render port.
//!
//! One `Gpu` is created per mounted page and dropped with it, so no GPU
//! resource outlives or is shared across pages.

use anyhow::{Context as _, Result};
use bytemuck::{Pod, Zeroable};
use egui_wgpu::wgpu;
use egui_winit::winit::{dpi::PhysicalSize, window::Window};
use wgpu::util::DeviceExt as _;

/// Instance-buffer capacity for meshes (5000-cube swarm plus headroom).
pub const MAX_MESH_INSTANCES: usize = 8192;
/// Instance-buffer capacity for particles (25k rain plus headroom).
pub const MAX_POINT_INSTANCES: usize = 32768;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame uniforms shared by both shaders.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Globals {
    /// Camera view-projection.
    pub view_proj: [[f32; 4]; 4],
    /// Camera right vector (billboards).
    pub cam_right: [f32; 3],
    pub _pad0: f32,
    /// Camera up vector (billboards).
    pub cam_up: [f32; 3],
    pub _pad1: f32,
    /// Direction toward the key light.
    pub light_dir: [f32; 3],
    /// Ambient intensity.
    pub ambient: f32,
    /// Fog color.
    pub fog_color: [f32; 3],
    /// Fog start distance.
    pub fog_near: f32,
    /// x: fog end, y: fog enabled, z: light intensity, w: unused.
    pub misc: [f32; 4],
}

/// Per-mesh instance data. `emissive.w` selects the shading mode:
/// 0 = lit, 1 = normal-visualized.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct MeshInstance {
    /// Model matrix (unit geometry scaled to full extents).
    pub model: [[f32; 4]; 4],
    /// Base color + opacity.
    pub color: [f32; 4],
    /// Emissive rgb + shading mode.
    pub emissive: [f32; 4],
}

/// Per-particle instance data.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct PointInstance {
    /// World center + sprite size.
    pub center_size: [f32; 4],
    /// Tint + opacity.
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct MeshVertex {
    pos: [f32; 3],
    normal: [f32; 3],
}

/// Uploaded vertex/index pair.
pub struct MeshBuffers {
    /// Vertex buffer.
    pub vbuf: wgpu::Buffer,
    /// Index buffer (u16).
    pub ibuf: wgpu::Buffer,
    /// Index count.
    pub count: u32,
}

/// The viewer's pipelines.
pub struct Pipelines {
    /// Opaque meshes: alpha replace, depth write.
    pub mesh: wgpu::RenderPipeline,
    /// Transparent meshes: alpha blend, depth read only.
    pub mesh_blend: wgpu::RenderPipeline,
    /// Billboarded, textured particles: alpha blend, depth read only.
    pub points: wgpu::RenderPipeline,
}

/// Device, surface, pipelines, and static buffers for one page.
pub struct Gpu {
    /// Logical device.
    pub device: wgpu::Device,
    /// Submission queue.
    pub queue: wgpu::Queue,
    /// Window-backed output surface.
    pub surface: wgpu::Surface<'static>,
    /// Current surface configuration.
    pub config: wgpu::SurfaceConfiguration,
    /// Depth attachment view, recreated on resize.
    pub depth: wgpu::TextureView,
    /// Render pipelines.
    pub pipelines: Pipelines,
    /// Per-frame uniform buffer.
    pub globals_buf: wgpu::Buffer,
    /// Mesh instance buffer.
    pub mesh_instance_buf: wgpu::Buffer,
    /// Particle instance buffer.
    pub point_instance_buf: wgpu::Buffer,
    /// Globals bind group (group 0).
    pub bind_group: wgpu::BindGroup,
    /// Layout for texture bind groups (group 1).
    pub texture_layout: wgpu::BindGroupLayout,
    /// Fallback 1×1 white texture bind group.
    pub white_bind: wgpu::BindGroup,
    /// Unit box (full extent 1) with per-face normals.
    pub unit_box: MeshBuffers,
    /// Unit plane in XY (full extent 1), +z normal.
    pub unit_plane: MeshBuffers,
    /// Corner quad for particle billboards.
    pub quad_buf: wgpu::Buffer,
}

impl Gpu {
    /// Bring up a device and swapchain on `window`.
    pub async fn new(window: &'static Window, vsync: bool) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .context("device request failed")?;

        let size = window.inner_size();
        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .context("surface is incompatible with the adapter")?;
        config.present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);
        let depth = create_depth(&device, &config);

        let globals_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let mesh_instance_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh-instances"),
            size: (MAX_MESH_INSTANCES * std::mem::size_of::<MeshInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let point_instance_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("point-instances"),
            size: (MAX_POINT_INSTANCES * std::mem::size_of::<PointInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals-layout"),
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
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buf.as_entire_binding(),
            }],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipelines = create_pipelines(&device, config.format, &globals_layout, &texture_layout);
        let unit_box = upload_mesh(&device, &box_vertices(), &box_indices(), "unit-box");
        let unit_plane = upload_mesh(&device, &plane_vertices(), &plane_indices(), "unit-plane");
        let quad_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("billboard-quad"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let white_bind = texture_bind(
            &device,
            &queue,
            &texture_layout,
            1,
            1,
            &[0xff, 0xff, 0xff, 0xff],
        );
        Ok(Self {
            device,
            queue,
            surface,
            config,
            depth,
            pipelines,
            globals_buf,
            mesh_instance_buf,
            point_instance_buf,
            bind_group,
            texture_layout,
            white_bind,
            unit_box,
            unit_plane,
            quad_buf,
        })
    }

    /// Reconfigure the swapchain and depth buffer for a new size.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = create_depth(&self.device, &self.config);
    }

    /// Upload RGBA8 pixels and wrap them in a sprite bind group.
    pub fn create_texture_bind(&self, width: u32, height: u32, rgba: &[u8]) -> wgpu::BindGroup {
        texture_bind(
            &self.device,
            &self.queue,
            &self.texture_layout,
            width,
            height,
            rgba,
        )
    }
}

fn texture_bind(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::BindGroup {
    let extent = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("sprite"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        extent,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("sprite-sampler"),
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..wgpu::SamplerDescriptor::default()
    });
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("sprite"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}

fn create_depth(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("depth"),
            size: wgpu::Extent3d {
                width: config.width.max(1),
                height: config.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

const MESH_VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const MESH_INSTANCE_ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
    2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4,
    6 => Float32x4, 7 => Float32x4
];
const QUAD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const POINT_INSTANCE_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![1 => Float32x4, 2 => Float32x4];

const QUAD_CORNERS: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

fn create_pipelines(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    globals_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
) -> Pipelines {
    let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("mesh"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
    });
    let points_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("points"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/points.wgsl").into()),
    });

    let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("mesh-layout"),
        bind_group_layouts: &[globals_layout],
        push_constant_ranges: &[],
    });
    let points_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("points-layout"),
        bind_group_layouts: &[globals_layout, texture_layout],
        push_constant_ranges: &[],
    });

    let mesh_buffers = [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &MESH_VERTEX_ATTRS,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &MESH_INSTANCE_ATTRS,
        },
    ];

    let mesh_pipeline = |label: &str, blend: Option<wgpu::BlendState>, depth_write: bool| {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&mesh_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &mesh_buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Double-sided materials exist in every demo; skip culling.
                cull_mode: None,
                ..wgpu::PrimitiveState::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: depth_write,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    };

    let mesh = mesh_pipeline("mesh-opaque", Some(wgpu::BlendState::REPLACE), true);
    let mesh_blend = mesh_pipeline("mesh-blend", Some(wgpu::BlendState::ALPHA_BLENDING), false);

    let points = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("points"),
        layout: Some(&points_layout),
        vertex: wgpu::VertexState {
            module: &points_shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &QUAD_ATTRS,
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<PointInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &POINT_INSTANCE_ATTRS,
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: &points_shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..wgpu::PrimitiveState::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            // Sprites read depth but never write it.
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    Pipelines {
        mesh,
        mesh_blend,
        points,
    }
}

fn upload_mesh(
    device: &wgpu::Device,
    vertices: &[MeshVertex],
    indices: &[u16],
    label: &str,
) -> MeshBuffers {
    let vbuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let ibuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    MeshBuffers {
        vbuf,
        ibuf,
        count: indices.len() as u32,
    }
}

fn box_vertices() -> Vec<MeshVertex> {
    let mut verts = Vec::with_capacity(24);
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        // (normal, tangent u, tangent v)
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    for (n, u, v) in faces {
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let pos = [
                n[0] * 0.5 + u[0] * su + v[0] * sv,
                n[1] * 0.5 + u[1] * su + v[1] * sv,
                n[2] * 0.5 + u[2] * su + v[2] * sv,
            ];
            verts.push(MeshVertex { pos, normal: n });
        }
    }
    verts
}

fn box_indices() -> Vec<u16> {
    let mut indices = Vec::with_capacity(36);
    for face in 0..6u16 {
        let base = face * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}

fn plane_vertices() -> Vec<MeshVertex> {
    let normal = [0.0, 0.0, 1.0];
    [
        [-0.5, -0.5, 0.0],
        [0.5, -0.5, 0.0],
        [0.5, 0.5, 0.0],
        [-0.5, 0.5, 0.0],
    ]
    .into_iter()
    .map(|pos| MeshVertex { pos, normal })
    .collect()
}

fn plane_indices() -> Vec<u16> {
    vec![0, 1, 2, 0, 2, 3]
}
