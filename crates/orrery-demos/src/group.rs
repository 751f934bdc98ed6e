// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Group-transform page: 5000 cubes moved as one unit through their parent.

use crate::placement::span;
use glam::{EulerRot, Quat, Vec3};
use orrery_core::{
    Animate, AssetPort, BuildCx, Color, Container, FrameCx, GeometryData, Light, MaterialData,
    Node, NodeId, RenderPort, Scene, SurfaceConfig, SurfaceController, Transform,
};
use std::f32::consts::FRAC_PI_2;

/// Number of cubes in the group.
pub const GROUP_COUNT: usize = 5000;
/// Cube spread, full extent per axis.
pub const GROUP_RANGE: f32 = 20.0;

const SEED: u64 = 0x6f72_7265_7279; // "orrery"

/// Content state: the group parent node.
pub struct GroupDemo {
    group: NodeId,
}

impl GroupDemo {
    /// Surface shape for this page.
    pub fn config() -> SurfaceConfig {
        SurfaceConfig {
            eye: Vec3::new(0.0, 0.0, 40.0),
            background: Color::BLACK,
            orbit: true,
            ..SurfaceConfig::default()
        }
    }

    fn build(cx: &mut BuildCx<'_>) -> Self {
        cx.scene.insert(Node::light(Light::Directional {
            position: Vec3::new(-5.0, 1.0, 0.0),
            color: Color::WHITE,
            intensity: 0.2,
            cast_shadow: false,
        }));

        // Floor plane, lying flat below the swarm.
        let floor_geometry = cx.resources.create_geometry(GeometryData::Plane {
            width: 8.0,
            height: 8.0,
        });
        let mut floor_material = MaterialData::standard(Color::from_hex(0x222222));
        floor_material.double_sided = true;
        let floor_material = cx.resources.create_material(floor_material);
        let mut floor = Node::mesh(floor_geometry, floor_material);
        floor.transform.rotation = Quat::from_rotation_x(FRAC_PI_2);
        floor.transform.translation = Vec3::new(0.0, -3.0, 0.0);
        cx.scene.insert(floor);

        // One shared geometry and material across all 5000 cubes.
        let cube_geometry = cx.resources.create_geometry(GeometryData::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        });
        let cube_material = cx
            .resources
            .create_material(MaterialData::normal().with_opacity(0.1));

        let group = cx.scene.insert(Node::group());
        let radius = GROUP_RANGE / 2.0;
        for i in 0..GROUP_COUNT {
            let position = Vec3::new(
                span(SEED, i as u64, 0, radius),
                span(SEED, i as u64, 1, radius),
                span(SEED, i as u64, 2, radius),
            );
            cx.scene.insert(
                Node::mesh(cube_geometry, cube_material)
                    .at(position)
                    .child_of(group),
            );
        }
        Self { group }
    }

    /// The group parent's node id.
    pub fn group(&self) -> NodeId {
        self.group
    }

    /// External control: set the group rotation from Euler angles.
    pub fn set_rotation(&self, scene: &mut Scene, euler: Vec3) {
        if let Some(node) = scene.get_mut(self.group) {
            node.transform.rotation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
        }
    }

    /// External control: set the group scale.
    pub fn set_scale(&self, scene: &mut Scene, scale: Vec3) {
        if let Some(node) = scene.get_mut(self.group) {
            node.transform.scale = scale;
        }
    }

    /// Current group transform.
    pub fn transform(&self, scene: &Scene) -> Option<Transform> {
        scene.get(self.group).map(|n| n.transform)
    }
}

impl Animate for GroupDemo {
    // The swarm itself is static; motion comes from the orbit control and
    // the externally driven group transform.
    fn advance(&mut self, _cx: &mut FrameCx<'_>) {}
}

/// Mount the group page into `container`.
pub fn mount<R: RenderPort>(
    container: &Container,
    renderer: R,
    assets: Box<dyn AssetPort>,
) -> Option<SurfaceController<R, GroupDemo>> {
    SurfaceController::acquire(container, GroupDemo::config(), renderer, assets, GroupDemo::build)
}
