// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Orbit and drag interaction, mutually exclusive while a drag is active.

use crate::{
    camera::{PerspectiveCamera, Ray},
    resources::Resources,
    scene::{Color, Drawable, NodeId, Scene},
};
use glam::Vec3;

const MIN_DISTANCE: f32 = 0.1;
const MAX_DISTANCE: f32 = 1.0e4;
// Pitch stays shy of the poles so the orbit basis never degenerates.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit-style camera control: yaw/pitch/distance around a target, with
/// velocity damping applied every tick.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    enabled: bool,
    /// Point the camera orbits.
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    vel_yaw: f32,
    vel_pitch: f32,
    damping: f32,
}

impl OrbitControls {
    /// Derive the orbit state from the camera's current pose.
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        let offset = camera.eye - camera.target;
        let distance = offset.length().max(MIN_DISTANCE);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        Self {
            enabled: true,
            target: camera.target,
            yaw,
            pitch,
            distance,
            vel_yaw: 0.0,
            vel_pitch: 0.0,
            damping: 0.1,
        }
    }

    /// Whether orbit input is currently accepted.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, on: bool) {
        self.enabled = on;
        if !on {
            self.vel_yaw = 0.0;
            self.vel_pitch = 0.0;
        }
    }

    /// Feed a pointer delta (radians) into the orbit velocity.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if !self.enabled {
            return;
        }
        self.vel_yaw += dx;
        self.vel_pitch += dy;
    }

    /// Scale the orbit distance; `factor` slightly below 1 zooms in.
    pub fn zoom(&mut self, factor: f32) {
        if !self.enabled {
            return;
        }
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Apply damped velocities and write the resulting pose to the camera.
    /// Runs every tick whether or not input arrived, so damping settles.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        self.yaw += self.vel_yaw;
        self.pitch = (self.pitch + self.vel_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.vel_yaw *= 1.0 - self.damping;
        self.vel_pitch *= 1.0 - self.damping;
        let offset = Vec3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        );
        camera.eye = self.target + offset;
        camera.look_at(self.target);
    }
}

#[derive(Clone, Copy, Debug)]
struct DragState {
    node: NodeId,
    /// Camera-facing plane through the grab point.
    plane_point: Vec3,
    plane_normal: Vec3,
    /// Node translation minus grab point, kept constant while dragging.
    grab_offset: Vec3,
}

/// The interaction set attached to one surface: an optional orbit control
/// and an optional drag control over registered target nodes. Starting a
/// drag disables orbit input until the drag ends.
#[derive(Debug, Default)]
pub struct Controls {
    /// Orbit control, when the surface config asked for one.
    pub orbit: Option<OrbitControls>,
    drag_enabled: bool,
    drag_targets: Vec<NodeId>,
    drag: Option<DragState>,
}

impl Controls {
    /// Build the interaction set from config flags.
    pub fn new(orbit: Option<OrbitControls>, drag_enabled: bool) -> Self {
        Self {
            orbit,
            drag_enabled,
            drag_targets: Vec::new(),
            drag: None,
        }
    }

    /// True while an orbit control exists and accepts input.
    pub fn orbit_enabled(&self) -> bool {
        self.orbit.as_ref().is_some_and(OrbitControls::enabled)
    }

    /// Node currently being dragged, if any.
    pub fn drag_active(&self) -> Option<NodeId> {
        self.drag.map(|d| d.node)
    }

    /// Register a node as draggable.
    pub fn add_drag_target(&mut self, id: NodeId) {
        self.drag_targets.push(id);
    }

    /// Per-tick update: settle orbit damping into the camera.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        if let Some(orbit) = self.orbit.as_mut() {
            orbit.update(camera);
        }
    }

    /// Try to start a drag at the picked target under `ray`. On success the
    /// orbit control is disabled for the duration and the material's
    /// emissive term (when it has one) takes a highlight.
    pub fn begin_drag(
        &mut self,
        camera: &PerspectiveCamera,
        scene: &mut Scene,
        resources: &mut Resources,
        ray: Ray,
    ) -> Option<NodeId> {
        if !self.drag_enabled || self.drag.is_some() {
            return None;
        }
        let (node, hit) = pick(scene, resources, &self.drag_targets, &ray)?;
        if let Some(orbit) = self.orbit.as_mut() {
            orbit.set_enabled(false);
        }
        set_emissive(scene, resources, node, Color::from_hex(0x333333));
        let translation = scene
            .get(node)
            .map(|n| n.transform.translation)
            .unwrap_or(hit);
        self.drag = Some(DragState {
            node,
            plane_point: hit,
            plane_normal: -camera.forward(),
            grab_offset: translation - hit,
        });
        Some(node)
    }

    /// Move the dragged node along its camera-facing plane.
    pub fn drag_to(&mut self, scene: &mut Scene, ray: Ray) {
        let Some(drag) = self.drag else { return };
        let denom = ray.dir.dot(drag.plane_normal);
        if denom.abs() < 1e-6 {
            return;
        }
        let t = (drag.plane_point - ray.origin).dot(drag.plane_normal) / denom;
        if t < 0.0 {
            return;
        }
        let hit = ray.origin + ray.dir * t;
        if let Some(node) = scene.get_mut(drag.node) {
            node.transform.translation = hit + drag.grab_offset;
        }
    }

    /// End the active drag: clear the highlight and restore orbit input.
    pub fn end_drag(&mut self, scene: &mut Scene, resources: &mut Resources) {
        let Some(drag) = self.drag.take() else { return };
        set_emissive(scene, resources, drag.node, Color::BLACK);
        if let Some(orbit) = self.orbit.as_mut() {
            orbit.set_enabled(true);
        }
    }
}

/// Capability check: only materials that carry an emissive term take the
/// highlight; everything else is skipped, never faulted.
fn set_emissive(scene: &Scene, resources: &mut Resources, node: NodeId, color: Color) {
    let Some(Drawable::Mesh { material, .. }) = scene.get(node).map(|n| n.drawable) else {
        return;
    };
    if let Some(mat) = resources.material_mut(material) {
        if let Some(emissive) = mat.emissive.as_mut() {
            *emissive = color;
        }
    }
}

/// Nearest drag target hit by the ray, with the world-space hit point.
fn pick(
    scene: &Scene,
    resources: &Resources,
    targets: &[NodeId],
    ray: &Ray,
) -> Option<(NodeId, Vec3)> {
    let mut best: Option<(NodeId, f32)> = None;
    for &id in targets {
        let Some(node) = scene.get(id) else { continue };
        if !node.visible {
            continue;
        }
        let Drawable::Mesh { geometry, .. } = node.drawable else {
            continue;
        };
        let Some(geom) = resources.geometry(geometry) else {
            continue;
        };
        let inv = scene.world_transform(id).inverse();
        // Direction deliberately left unnormalized: the slab parameter then
        // matches the world-space ray parameter.
        let origin = inv.transform_point3(ray.origin);
        let dir = inv.transform_vector3(ray.dir);
        if let Some(t) = ray_box(origin, dir, geom.half_extents()) {
            if best.is_none_or(|(_, bt)| t < bt) {
                best = Some((id, t));
            }
        }
    }
    best.map(|(id, t)| (id, ray.origin + ray.dir * t))
}

/// Slab test of a ray against an origin-centered box; returns the entry
/// parameter, 0 when the origin starts inside.
fn ray_box(origin: Vec3, dir: Vec3, half: Vec3) -> Option<f32> {
    let mut tmin = 0.0_f32;
    let mut tmax = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let h = half[axis];
        if d.abs() < 1e-9 {
            if o.abs() > h {
                return None;
            }
        } else {
            let mut t0 = (-h - o) / d;
            let mut t1 = (h - o) / d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
            if tmin > tmax {
                return None;
            }
        }
    }
    Some(tmin)
}
