// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! RenderPort adapter over wgpu, including the egui overlay pass.

use crate::gpu::{
    Globals, Gpu, MeshInstance, PointInstance, MAX_MESH_INSTANCES, MAX_POINT_INSTANCES,
};
use egui_wgpu::wgpu;
use egui_winit::winit::{dpi::PhysicalSize, window::Window};
use glam::{Mat4, Vec3};
use orrery_core::{
    Color, Drawable, GeometryData, Light, PerspectiveCamera, RenderPort, Resources, Shading,
    SurfaceError, TextureHandle,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One frame's egui output, handed to the port before the page draws.
pub struct OverlayFrame {
    /// Tessellated egui primitives.
    pub paint_jobs: Vec<egui::epaint::ClippedPrimitive>,
    /// Texture changes for the egui renderer.
    pub textures_delta: egui::TexturesDelta,
    /// Output geometry for the egui pass.
    pub screen_desc: egui_wgpu::ScreenDescriptor,
}

#[derive(Default)]
struct MeshBatches {
    box_opaque: Vec<MeshInstance>,
    plane_opaque: Vec<MeshInstance>,
    box_blend: Vec<MeshInstance>,
    plane_blend: Vec<MeshInstance>,
}

/// wgpu-backed render port. Created per mounted page; `dispose` drops the
/// device-side context, `detach` drops the window-side surface.
pub struct WgpuPort {
    gpu: Option<Gpu>,
    surface_after_dispose: Option<wgpu::Surface<'static>>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    overlay: Option<OverlayFrame>,
    sprite_binds: HashMap<TextureHandle, wgpu::BindGroup>,
    shadows: bool,
    truncation_warned: bool,
}

impl WgpuPort {
    /// Bring up a device and swapchain on `window`.
    pub fn new(window: &'static Window, vsync: bool) -> anyhow::Result<Self> {
        let gpu = pollster::block_on(Gpu::new(window, vsync))?;
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.config.format,
            egui_wgpu::RendererOptions::default(),
        );
        Ok(Self {
            gpu: Some(gpu),
            surface_after_dispose: None,
            egui_renderer: Some(egui_renderer),
            overlay: None,
            sprite_binds: HashMap::new(),
            shadows: false,
            truncation_warned: false,
        })
    }

    /// Queue this frame's egui output for compositing over the scene.
    pub fn set_overlay(&mut self, overlay: OverlayFrame) {
        self.overlay = Some(overlay);
    }

    fn gather(
        &mut self,
        scene: &orrery_core::Scene,
        resources: &Resources,
    ) -> (MeshBatches, Vec<PointInstance>, Option<TextureHandle>, Globals, Color) {
        let mut batches = MeshBatches::default();
        let mut points: Vec<PointInstance> = Vec::new();
        let mut sprite: Option<TextureHandle> = None;
        let mut light_dir = Vec3::new(0.2, 0.7, 0.6);
        let mut light_intensity = 1.0_f32;
        let mut ambient = 0.0_f32;

        for (id, node) in scene.iter() {
            if !node.visible {
                continue;
            }
            match node.drawable {
                Drawable::Group => {}
                Drawable::Light(Light::Directional {
                    position,
                    intensity,
                    ..
                }) => {
                    light_dir = position.normalize_or_zero();
                    light_intensity = intensity;
                }
                Drawable::Light(Light::Ambient { intensity, .. }) => ambient += intensity,
                Drawable::Mesh { geometry, material } => {
                    let (Some(geom), Some(mat)) =
                        (resources.geometry(geometry), resources.material(material))
                    else {
                        continue;
                    };
                    // Shadow catchers show nothing without a shadow pass.
                    if mat.shading == Shading::Shadow {
                        continue;
                    }
                    let world = scene.world_transform(id);
                    let (scale, is_plane) = match *geom {
                        GeometryData::Box {
                            width,
                            height,
                            depth,
                        } => (Vec3::new(width, height, depth), false),
                        GeometryData::Plane { width, height } => {
                            (Vec3::new(width, height, 1.0), true)
                        }
                        GeometryData::PointCloud { .. } => continue,
                    };
                    let model = world * Mat4::from_scale(scale);
                    let mode = if mat.shading == Shading::Normal { 1.0 } else { 0.0 };
                    let emissive = mat.emissive.unwrap_or(Color::BLACK);
                    let alpha = if mat.transparent { mat.opacity } else { 1.0 };
                    let instance = MeshInstance {
                        model: model.to_cols_array_2d(),
                        color: [mat.color.r, mat.color.g, mat.color.b, alpha],
                        emissive: [emissive.r, emissive.g, emissive.b, mode],
                    };
                    let list = match (mat.transparent, is_plane) {
                        (false, false) => &mut batches.box_opaque,
                        (false, true) => &mut batches.plane_opaque,
                        (true, false) => &mut batches.box_blend,
                        (true, true) => &mut batches.plane_blend,
                    };
                    list.push(instance);
                }
                Drawable::Points { geometry, material } => {
                    let (Some(geom), Some(mat)) =
                        (resources.geometry(geometry), resources.material(material))
                    else {
                        continue;
                    };
                    let GeometryData::PointCloud {
                        positions,
                        point_size,
                    } = geom
                    else {
                        continue;
                    };
                    sprite = mat.map;
                    let alpha = if mat.transparent { mat.opacity } else { 1.0 };
                    for p in positions {
                        points.push(PointInstance {
                            center_size: [p.x, p.y, p.z, *point_size],
                            color: [mat.color.r, mat.color.g, mat.color.b, alpha],
                        });
                    }
                }
            }
        }

        let globals = Globals {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(), // filled by draw
            cam_right: [0.0; 3],
            _pad0: 0.0,
            cam_up: [0.0; 3],
            _pad1: 0.0,
            light_dir: light_dir.to_array(),
            ambient,
            fog_color: [0.0; 3],
            fog_near: 0.0,
            misc: [0.0, 0.0, light_intensity, 0.0],
        };
        (batches, points, sprite, globals, scene.background)
    }
}

impl RenderPort for WgpuPort {
    fn set_size(&mut self, width: u32, height: u32) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(PhysicalSize::new(width, height));
        }
    }

    fn set_shadows(&mut self, enabled: bool) {
        if enabled && !self.shadows {
            debug!("shadows requested; this backend shades without a shadow map pass");
        }
        self.shadows = enabled;
    }

    fn draw(
        &mut self,
        scene: &orrery_core::Scene,
        camera: &PerspectiveCamera,
        resources: &Resources,
    ) -> Result<(), SurfaceError> {
        let (mut batches, mut points, sprite, mut globals, background) =
            self.gather(scene, resources);
        let Some(gpu) = self.gpu.as_mut() else {
            return Err(SurfaceError::OutputLost);
        };

        // Camera-derived globals.
        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward);
        globals.view_proj = camera.view_proj().to_cols_array_2d();
        globals.cam_right = right.to_array();
        globals.cam_up = up.to_array();
        if let Some(fog) = scene.fog {
            globals.fog_color = fog.color.to_array();
            globals.fog_near = fog.near;
            globals.misc[0] = fog.far;
            globals.misc[1] = 1.0;
        }
        gpu.queue
            .write_buffer(&gpu.globals_buf, 0, bytemuck::bytes_of(&globals));

        // Concatenate mesh batches into the instance buffer, tracking
        // [start, end) ranges per draw.
        let mut instances: Vec<MeshInstance> = Vec::with_capacity(
            batches.box_opaque.len()
                + batches.plane_opaque.len()
                + batches.box_blend.len()
                + batches.plane_blend.len(),
        );
        let range = |list: &mut Vec<MeshInstance>, instances: &mut Vec<MeshInstance>| {
            let start = instances.len() as u32;
            instances.append(list);
            start..instances.len() as u32
        };
        let box_opaque = range(&mut batches.box_opaque, &mut instances);
        let plane_opaque = range(&mut batches.plane_opaque, &mut instances);
        let box_blend = range(&mut batches.box_blend, &mut instances);
        let plane_blend = range(&mut batches.plane_blend, &mut instances);
        if instances.len() > MAX_MESH_INSTANCES {
            if !self.truncation_warned {
                warn!(
                    "mesh instances {} exceed capacity {}; truncating",
                    instances.len(),
                    MAX_MESH_INSTANCES
                );
                self.truncation_warned = true;
            }
            instances.truncate(MAX_MESH_INSTANCES);
        }
        if points.len() > MAX_POINT_INSTANCES {
            if !self.truncation_warned {
                warn!(
                    "point instances {} exceed capacity {}; truncating",
                    points.len(),
                    MAX_POINT_INSTANCES
                );
                self.truncation_warned = true;
            }
            points.truncate(MAX_POINT_INSTANCES);
        }
        if !instances.is_empty() {
            gpu.queue.write_buffer(
                &gpu.mesh_instance_buf,
                0,
                bytemuck::cast_slice(&instances),
            );
        }
        if !points.is_empty() {
            gpu.queue
                .write_buffer(&gpu.point_instance_buf, 0, bytemuck::cast_slice(&points));
        }

        // Sprite bind group for the point cloud, uploaded on first sight.
        if let Some(handle) = sprite {
            if !self.sprite_binds.contains_key(&handle) {
                if let Some(data) = resources.texture(handle) {
                    let bind = gpu.create_texture_bind(data.width, data.height, &data.rgba);
                    self.sprite_binds.insert(handle, bind);
                }
            }
        }

        let frame = match gpu.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost) => {
                gpu.resize(PhysicalSize::new(gpu.config.width, gpu.config.height));
                match gpu.surface.get_current_texture() {
                    Ok(f) => f,
                    Err(_) => return Err(SurfaceError::OutputLost),
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(SurfaceError::Backend("surface out of memory".into()));
            }
            Err(_) => return Err(SurfaceError::OutputLost),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("main-encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(background.r),
                            g: f64::from(background.g),
                            b: f64::from(background.b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let instance_stride = std::mem::size_of::<MeshInstance>() as u64;
            let draw_meshes =
                |rpass: &mut wgpu::RenderPass<'_>,
                 pipeline: &wgpu::RenderPipeline,
                 mesh: &crate::gpu::MeshBuffers,
                 range: &std::ops::Range<u32>| {
                    let cap = MAX_MESH_INSTANCES as u32;
                    let clamped = range.start.min(cap)..range.end.min(cap);
                    if clamped.is_empty() {
                        return;
                    }
                    rpass.set_pipeline(pipeline);
                    rpass.set_bind_group(0, &gpu.bind_group, &[]);
                    rpass.set_vertex_buffer(0, mesh.vbuf.slice(..));
                    rpass.set_vertex_buffer(
                        1,
                        gpu.mesh_instance_buf
                            .slice(..instances.len() as u64 * instance_stride),
                    );
                    rpass.set_index_buffer(mesh.ibuf.slice(..), wgpu::IndexFormat::Uint16);
                    rpass.draw_indexed(0..mesh.count, 0, clamped);
                };
            draw_meshes(&mut rpass, &gpu.pipelines.mesh, &gpu.unit_box, &box_opaque);
            draw_meshes(
                &mut rpass,
                &gpu.pipelines.mesh,
                &gpu.unit_plane,
                &plane_opaque,
            );
            draw_meshes(
                &mut rpass,
                &gpu.pipelines.mesh_blend,
                &gpu.unit_box,
                &box_blend,
            );
            draw_meshes(
                &mut rpass,
                &gpu.pipelines.mesh_blend,
                &gpu.unit_plane,
                &plane_blend,
            );

            if !points.is_empty() {
                let bind = sprite
                    .and_then(|h| self.sprite_binds.get(&h))
                    .unwrap_or(&gpu.white_bind);
                rpass.set_pipeline(&gpu.pipelines.points);
                rpass.set_bind_group(0, &gpu.bind_group, &[]);
                rpass.set_bind_group(1, bind, &[]);
                rpass.set_vertex_buffer(0, gpu.quad_buf.slice(..));
                rpass.set_vertex_buffer(
                    1,
                    gpu.point_instance_buf.slice(
                        ..points.len() as u64 * std::mem::size_of::<PointInstance>() as u64,
                    ),
                );
                rpass.draw(0..6, 0..points.len() as u32);
            }
        }
        let cmd_main = encoder.finish();

        // egui overlay pass, when the app queued one for this frame.
        let cmd_ui = self.overlay.take().and_then(|overlay| {
            let egui_renderer = self.egui_renderer.as_mut()?;
            let mut egui_encoder =
                gpu.device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("egui-encoder"),
                    });
            for (id, delta) in overlay.textures_delta.set {
                egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
            }
            egui_renderer.update_buffers(
                &gpu.device,
                &gpu.queue,
                &mut egui_encoder,
                &overlay.paint_jobs,
                &overlay.screen_desc,
            );
            {
                let rpass = egui_encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });
                let mut rpass = rpass.forget_lifetime();
                egui_renderer.render(&mut rpass, &overlay.paint_jobs, &overlay.screen_desc);
            }
            for id in overlay.textures_delta.free {
                egui_renderer.free_texture(&id);
            }
            Some(egui_encoder.finish())
        });

        match cmd_ui {
            Some(cmd_ui) => gpu.queue.submit([cmd_main, cmd_ui]),
            None => gpu.queue.submit([cmd_main]),
        };
        frame.present();
        Ok(())
    }

    fn release(&mut self, resources: &Resources) {
        let mut dropped = 0usize;
        for handle in resources.texture_handles() {
            if self.sprite_binds.remove(&handle).is_some() {
                dropped += 1;
            }
        }
        self.sprite_binds.clear();
        debug!("released {dropped} sprite bindings");
    }

    fn dispose(&mut self) {
        self.overlay = None;
        self.egui_renderer = None;
        if let Some(gpu) = self.gpu.take() {
            // Keep the window-side surface alive until detach, mirroring
            // context release before output removal.
            let Gpu { surface, .. } = gpu;
            self.surface_after_dispose = Some(surface);
        }
    }

    fn detach(&mut self) {
        if self.surface_after_dispose.take().is_some() {
            debug!("surface output detached");
        }
    }
}
