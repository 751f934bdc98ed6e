// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Spinning-cube page: one lit box advancing a fixed rotation per tick.

use glam::{EulerRot, Quat, Vec3};
use orrery_core::{
    Animate, AssetPort, BuildCx, Color, Container, FrameCx, GeometryData, Light, MaterialData,
    Node, NodeId, RenderPort, SurfaceConfig, SurfaceController,
};

/// Per-tick rotation advance, radians, applied to both x and y.
const SPIN_RATE: f32 = 0.01;

/// Content state: the cube node and its accumulated angles.
pub struct CubeDemo {
    cube: NodeId,
    angle_x: f32,
    angle_y: f32,
}

impl CubeDemo {
    /// Surface shape for this page.
    pub fn config() -> SurfaceConfig {
        SurfaceConfig {
            eye: Vec3::new(0.0, 0.0, 20.0),
            background: Color::from_hex(0x202020),
            ..SurfaceConfig::default()
        }
    }

    fn build(cx: &mut BuildCx<'_>) -> Self {
        let geometry = cx.resources.create_geometry(GeometryData::Box {
            width: 10.0,
            height: 10.0,
            depth: 10.0,
        });
        let material = cx
            .resources
            .create_material(MaterialData::standard(Color::from_hex(0x00ff00)));
        let cube = cx.scene.insert(Node::mesh(geometry, material));
        cx.scene.insert(Node::light(Light::Directional {
            position: Vec3::new(5.0, 10.0, 5.0),
            color: Color::WHITE,
            intensity: 1.0,
            cast_shadow: false,
        }));
        Self {
            cube,
            angle_x: 0.0,
            angle_y: 0.0,
        }
    }

    /// The cube's node id.
    pub fn cube(&self) -> NodeId {
        self.cube
    }

    /// Accumulated y angle, radians.
    pub fn angle_y(&self) -> f32 {
        self.angle_y
    }
}

impl Animate for CubeDemo {
    fn advance(&mut self, cx: &mut FrameCx<'_>) {
        self.angle_x += SPIN_RATE;
        self.angle_y += SPIN_RATE;
        if let Some(node) = cx.scene.get_mut(self.cube) {
            node.transform.rotation = Quat::from_euler(EulerRot::XYZ, self.angle_x, self.angle_y, 0.0);
        }
    }
}

/// Mount the spinning-cube page into `container`.
pub fn mount<R: RenderPort>(
    container: &Container,
    renderer: R,
    assets: Box<dyn AssetPort>,
) -> Option<SurfaceController<R, CubeDemo>> {
    SurfaceController::acquire(container, CubeDemo::config(), renderer, assets, CubeDemo::build)
}
