// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Domino-chain page: a rapier world owns the dominos, the scene mirrors it.
//!
//! Each tick steps the world one fixed increment, then copies body *i*'s
//! translation and rotation onto drawable *i* — the pairing established at
//! setup is never permuted. Reset is a full dispose + remount at the page
//! level; the world drops with the content.

use glam::{Quat, Vec3};
use orrery_core::{
    Animate, AssetPort, BuildCx, Color, Container, FrameCx, GeometryData, Light, MaterialData,
    Node, NodeId, RenderPort, SurfaceConfig, SurfaceController, Transform,
};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

/// Domino block extents (x, y, z).
pub const DOMINO_SIZE: [f32; 3] = [0.05, 0.5, 0.2];
/// Impulse magnitude applied to the first domino.
const TIP_IMPULSE: f32 = 0.03;
/// Resting height of a standing domino's center.
const DOMINO_Y: f32 = 0.35;

const GROUND_SIZE: [f32; 3] = [6.0, 0.2, 6.0];
const WALL_ALONG_Z: [f32; 3] = [0.2, 0.3, 6.0];
const WALL_ALONG_X: [f32; 3] = [6.4, 0.3, 0.2];

/// Adjustable physics settings.
#[derive(Clone, Copy, Debug)]
pub struct DominoConfig {
    /// World gravity.
    pub gravity: Vec3,
}

impl Default for DominoConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

/// Content state: the rapier world and the index-aligned node/body pairs.
pub struct DominoDemo {
    gravity: Vec3,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    /// Drawable *i* is driven by rigid body *i*.
    dominos: Vec<(NodeId, RigidBodyHandle)>,
}

impl DominoDemo {
    /// Surface shape for this page.
    pub fn config() -> SurfaceConfig {
        SurfaceConfig {
            fov_y_deg: 60.0,
            far: 100.0,
            eye: Vec3::new(-1.5, 4.0, -4.0),
            background: Color::from_hex(0x202020),
            shadows: true,
            orbit: true,
            ..SurfaceConfig::default()
        }
    }

    fn build(config: DominoConfig) -> impl FnOnce(&mut BuildCx<'_>) -> Self {
        move |cx| {
            let mut demo = Self {
                gravity: config.gravity,
                params: IntegrationParameters::default(),
                pipeline: PhysicsPipeline::new(),
                islands: IslandManager::new(),
                broad_phase: DefaultBroadPhase::new(),
                narrow_phase: NarrowPhase::new(),
                bodies: RigidBodySet::new(),
                colliders: ColliderSet::new(),
                impulse_joints: ImpulseJointSet::new(),
                multibody_joints: MultibodyJointSet::new(),
                ccd: CCDSolver::new(),
                dominos: Vec::new(),
            };

            cx.scene.insert(Node::light(Light::Directional {
                position: Vec3::new(5.0, 10.0, 5.0),
                color: Color::WHITE,
                intensity: 1.0,
                cast_shadow: true,
            }));
            cx.scene.insert(Node::light(Light::Ambient {
                color: Color::WHITE,
                intensity: 0.4,
            }));

            demo.build_arena(cx);
            demo.build_dominos(cx);
            demo
        }
    }

    /// Ground and walls: static meshes backed by fixed bodies.
    fn build_arena(&mut self, cx: &mut BuildCx<'_>) {
        let material = cx
            .resources
            .create_material(MaterialData::standard(Color::from_hex(0x8a6d4a)));
        let pieces: [([f32; 3], Vec3); 5] = [
            (GROUND_SIZE, Vec3::ZERO),
            (WALL_ALONG_Z, Vec3::new(-3.1, 0.2, 0.0)),
            (WALL_ALONG_Z, Vec3::new(3.1, 0.2, 0.0)),
            (WALL_ALONG_X, Vec3::new(0.0, 0.2, 3.0)),
            (WALL_ALONG_X, Vec3::new(0.0, 0.22, -3.0)),
        ];
        for (size, position) in pieces {
            let geometry = cx.resources.create_geometry(GeometryData::Box {
                width: size[0],
                height: size[1],
                depth: size[2],
            });
            cx.scene.insert(Node::mesh(geometry, material).at(position));
            let body = self.bodies.insert(
                RigidBodyBuilder::fixed().translation(vector![position.x, position.y, position.z]),
            );
            self.colliders.insert_with_parent(
                ColliderBuilder::cuboid(size[0] / 2.0, size[1] / 2.0, size[2] / 2.0),
                body,
                &mut self.bodies,
            );
        }
    }

    /// The spiral of dominos, plus the tip impulse on the first one.
    fn build_dominos(&mut self, cx: &mut BuildCx<'_>) {
        let geometry = cx.resources.create_geometry(GeometryData::Box {
            width: DOMINO_SIZE[0],
            height: DOMINO_SIZE[1],
            depth: DOMINO_SIZE[2],
        });
        let even = cx
            .resources
            .create_material(MaterialData::standard(Color::from_hex(0x66ff00)).with_opacity(0.8));
        let odd = cx
            .resources
            .create_material(MaterialData::standard(Color::from_hex(0x6600ff)).with_opacity(0.8));

        let points = spiral_points();
        for (idx, point) in points.iter().enumerate() {
            // Orient toward the spiral center while still at ground level,
            // then lift to standing height.
            let mut transform = Transform::from_translation(*point);
            transform.look_at(Vec3::ZERO, Vec3::Y);
            transform.translation.y = DOMINO_Y;

            let material = if idx % 2 == 0 { even } else { odd };
            let node = cx
                .scene
                .insert(Node::mesh(geometry, material).with_transform(transform));

            let rotation = transform.rotation;
            let position = Isometry::from_parts(
                vector![transform.translation.x, transform.translation.y, transform.translation.z]
                    .into(),
                UnitQuaternion::from_quaternion(Quaternion::new(
                    rotation.w, rotation.x, rotation.y, rotation.z,
                )),
            );
            let body = self.bodies.insert(
                RigidBodyBuilder::dynamic()
                    .position(position)
                    .gravity_scale(1.0)
                    .can_sleep(false)
                    .ccd_enabled(true),
            );
            self.colliders.insert_with_parent(
                ColliderBuilder::cuboid(
                    DOMINO_SIZE[0] / 2.0,
                    DOMINO_SIZE[1] / 2.0,
                    DOMINO_SIZE[2] / 2.0,
                ),
                body,
                &mut self.bodies,
            );
            self.dominos.push((node, body));
        }

        // Tip the first domino toward the second.
        if points.len() > 1 {
            let tangent = (points[1] - points[0]).normalize_or_zero();
            if let Some((_, first)) = self.dominos.first() {
                if let Some(body) = self.bodies.get_mut(*first) {
                    body.apply_impulse(
                        vector![tangent.x * TIP_IMPULSE, 0.0, tangent.z * TIP_IMPULSE],
                        true,
                    );
                }
            }
        }
    }

    /// External control: set the world gravity.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Current world gravity.
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Number of dominos.
    pub fn domino_count(&self) -> usize {
        self.dominos.len()
    }

    /// Scene node of domino `i`.
    pub fn domino_node(&self, i: usize) -> Option<NodeId> {
        self.dominos.get(i).map(|(node, _)| *node)
    }

    /// Authoritative pose of rigid body `i`.
    pub fn body_pose(&self, i: usize) -> Option<(Vec3, Quat)> {
        let (_, handle) = self.dominos.get(i)?;
        let body = self.bodies.get(*handle)?;
        let t = body.translation();
        let q = body.rotation().coords;
        Some((Vec3::new(t.x, t.y, t.z), Quat::from_xyzw(q.x, q.y, q.z, q.w)))
    }
}

impl Animate for DominoDemo {
    fn advance(&mut self, cx: &mut FrameCx<'_>) {
        let gravity = vector![self.gravity.x, self.gravity.y, self.gravity.z];
        self.pipeline.step(
            &gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
        for (node, handle) in &self.dominos {
            let Some(body) = self.bodies.get(*handle) else {
                continue;
            };
            let t = body.translation();
            let q = body.rotation().coords;
            if let Some(n) = cx.scene.get_mut(*node) {
                n.transform.translation = Vec3::new(t.x, t.y, t.z);
                n.transform.rotation = Quat::from_xyzw(q.x, q.y, q.z, q.w);
            }
        }
    }
}

/// Domino placement: an inward spiral with a growing step, mirroring the
/// page's layout constants.
fn spiral_points() -> Vec<Vec3> {
    let r = 2.8_f32;
    let mut points = Vec::new();
    let mut i = 0.0_f32;
    while i < 1200.0 {
        let offset = 1.5 * (i / 360.0);
        let angle = i.to_radians();
        let reach = (r / 1440.0) * (1440.0 - i);
        points.push(Vec3::new(reach * angle.cos(), 0.0, reach * angle.sin()));
        i += 6.0 + offset;
    }
    points
}

/// Mount the domino page with default physics settings.
pub fn mount<R: RenderPort>(
    container: &Container,
    renderer: R,
    assets: Box<dyn AssetPort>,
) -> Option<SurfaceController<R, DominoDemo>> {
    mount_with(container, renderer, assets, DominoConfig::default())
}

/// Mount the domino page with explicit physics settings. Reset is a fresh
/// `mount_with` after disposing the old controller, never a partial reset.
pub fn mount_with<R: RenderPort>(
    container: &Container,
    renderer: R,
    assets: Box<dyn AssetPort>,
    config: DominoConfig,
) -> Option<SurfaceController<R, DominoDemo>> {
    SurfaceController::acquire(
        container,
        DominoDemo::config(),
        renderer,
        assets,
        DominoDemo::build(config),
    )
}

#[cfg(test)]
mod tests {
    use super::spiral_points;

    #[test]
    fn spiral_has_a_stable_count_and_shrinks_inward() {
        let points = spiral_points();
        assert!(points.len() > 60, "spiral should hold dozens of dominos");
        let first = points.first().expect("nonempty").length();
        let last = points.last().expect("nonempty").length();
        assert!(last < first, "later dominos sit closer to the center");
    }

    #[test]
    fn neighboring_dominos_stay_within_tipping_distance() {
        let points = spiral_points();
        for pair in points.windows(2) {
            let gap = (pair[1] - pair[0]).length();
            assert!(gap < 0.55, "gap {gap} exceeds a falling domino's reach");
        }
    }
}
