// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Drag page: a 1000-cube grid under simultaneous orbit and drag controls.
//!
//! Both controls attach to the same surface; the controller suspends orbit
//! input for the duration of a drag and restores it on release.

use crate::placement::{span, unit};
use glam::Vec3;
use orrery_core::{
    Animate, AssetPort, BuildCx, Color, Container, FrameCx, GeometryData, Light, MaterialData,
    Node, NodeId, RenderPort, SurfaceConfig, SurfaceController,
};
use std::f32::consts::FRAC_PI_2;

/// Cubes in the grid.
pub const DRAG_COUNT: usize = 1000;
/// Cube spawn spread, full extent per axis.
const SPREAD: f32 = 10.0;

const SEED: u64 = 0x6472_6167; // "drag"

/// Content state: the draggable cube nodes.
pub struct DragDemo {
    cubes: Vec<NodeId>,
}

impl DragDemo {
    /// Surface shape for this page.
    pub fn config() -> SurfaceConfig {
        SurfaceConfig {
            eye: Vec3::new(-3.0, 2.0, 8.0),
            background: Color::from_hex(0xffffff),
            shadows: true,
            orbit: true,
            drag: true,
            ..SurfaceConfig::default()
        }
    }

    fn build(cx: &mut BuildCx<'_>) -> Self {
        cx.scene.insert(Node::light(Light::Ambient {
            color: Color::WHITE,
            intensity: 0.5,
        }));
        cx.scene.insert(Node::light(Light::Directional {
            position: Vec3::new(5.0, 10.0, 7.0),
            color: Color::WHITE,
            intensity: 1.0,
            cast_shadow: true,
        }));

        // Shadow-catcher floor under the grid.
        let floor_geometry = cx.resources.create_geometry(GeometryData::Plane {
            width: 8.0,
            height: 8.0,
        });
        let floor_material = cx.resources.create_material(MaterialData::shadow(0.2));
        let mut floor = Node::mesh(floor_geometry, floor_material);
        floor.transform.rotation = glam::Quat::from_rotation_x(-FRAC_PI_2);
        cx.scene.insert(floor);

        // One shared geometry; per-cube materials so a dragged cube can
        // take its own emissive highlight.
        let geometry = cx.resources.create_geometry(GeometryData::Box {
            width: 0.5,
            height: 0.5,
            depth: 0.5,
        });
        let mut cubes = Vec::with_capacity(DRAG_COUNT);
        let radius = SPREAD / 2.0;
        for i in 0..DRAG_COUNT as u64 {
            let tint = (f64::from(0x3333ff) * f64::from(unit(SEED, i, 3))) as u32;
            let material = cx
                .resources
                .create_material(MaterialData::phong(Color::from_hex(tint)).with_opacity(0.9));
            let position = Vec3::new(
                span(SEED, i, 0, radius),
                span(SEED, i, 1, radius),
                span(SEED, i, 2, radius),
            );
            let cube = cx.scene.insert(Node::mesh(geometry, material).at(position));
            cx.controls.add_drag_target(cube);
            cubes.push(cube);
        }
        Self { cubes }
    }

    /// Node ids of every cube, in creation order.
    pub fn cubes(&self) -> &[NodeId] {
        &self.cubes
    }
}

impl Animate for DragDemo {
    // The grid is static; motion comes from the controls.
    fn advance(&mut self, _cx: &mut FrameCx<'_>) {}
}

/// Mount the drag page into `container`.
pub fn mount<R: RenderPort>(
    container: &Container,
    renderer: R,
    assets: Box<dyn AssetPort>,
) -> Option<SurfaceController<R, DragDemo>> {
    SurfaceController::acquire(container, DragDemo::config(), renderer, assets, DragDemo::build)
}
