// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rotate-on-demand page: a cube lerping toward a stepped target angle.
//!
//! An external trigger grows the target by a quarter turn; the rendered
//! angle closes 8% of the remaining gap per tick, so it converges without
//! ever overshooting.

use glam::{Quat, Vec3};
use orrery_core::{
    lerp, Animate, AssetPort, BuildCx, Color, Container, FrameCx, GeometryData, Light,
    MaterialData, Node, NodeId, RenderPort, SurfaceConfig, SurfaceController,
};
use std::f32::consts::FRAC_PI_2;

/// Fraction of the remaining gap closed per tick.
const LERP_FACTOR: f32 = 0.08;

/// Content state: the cube node, its rendered angle, and the target.
pub struct RotateDemo {
    cube: NodeId,
    angle: f32,
    target: f32,
}

impl RotateDemo {
    /// Surface shape for this page.
    pub fn config() -> SurfaceConfig {
        SurfaceConfig {
            eye: Vec3::new(20.0, 20.0, 20.0),
            background: Color::BLACK,
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
            angle: 0.0,
            target: 0.0,
        }
    }

    /// External trigger: advance the target by a quarter turn.
    pub fn trigger_quarter_turn(&mut self) {
        self.target += FRAC_PI_2;
    }

    /// Current target angle, radians.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Currently rendered angle, radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl Animate for RotateDemo {
    fn advance(&mut self, cx: &mut FrameCx<'_>) {
        self.angle = lerp(self.angle, self.target, LERP_FACTOR);
        if let Some(node) = cx.scene.get_mut(self.cube) {
            node.transform.rotation = Quat::from_rotation_y(self.angle);
        }
    }
}

/// Mount the rotate page into `container`.
pub fn mount<R: RenderPort>(
    container: &Container,
    renderer: R,
    assets: Box<dyn AssetPort>,
) -> Option<SurfaceController<R, RotateDemo>> {
    SurfaceController::acquire(container, RotateDemo::config(), renderer, assets, RotateDemo::build)
}
