// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Orbit/drag arbitration: starting a drag suspends orbit input until the
//! drag ends; emissive highlights respect material capabilities.

use glam::Vec3;
use orrery_core::{
    Animate, Color, Container, FrameCx, GeometryData, MaterialData, MaterialHandle, NoAssets,
    Node, NodeId, SurfaceConfig, SurfaceController,
};
use orrery_dry_tests::FakeRenderPort;

struct DragContent {
    cube: NodeId,
    material: MaterialHandle,
}

impl Animate for DragContent {
    fn advance(&mut self, _cx: &mut FrameCx<'_>) {}
}

fn mount(material: MaterialData) -> SurfaceController<FakeRenderPort, DragContent> {
    let (port, _log) = FakeRenderPort::new();
    let config = SurfaceConfig {
        eye: Vec3::new(0.0, 0.0, 8.0),
        orbit: true,
        drag: true,
        ..SurfaceConfig::default()
    };
    SurfaceController::acquire(
        &Container::window(800, 800),
        config,
        port,
        Box::new(NoAssets),
        move |cx| {
            let geometry = cx.resources.create_geometry(GeometryData::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            });
            let material = cx.resources.create_material(material);
            let cube = cx.scene.insert(Node::mesh(geometry, material));
            cx.controls.add_drag_target(cube);
            DragContent { cube, material }
        },
    )
    .expect("mounted")
}

#[test]
fn drag_suspends_orbit_until_released() {
    let mut controller = mount(MaterialData::phong(Color::from_hex(0x3333ff)));
    assert!(controller.orbit_enabled());
    let picked = controller.begin_drag(0.0, 0.0);
    assert_eq!(picked, controller.content().map(|c| c.cube));
    assert!(!controller.orbit_enabled());
    assert!(controller.drag_active());
    controller.end_drag();
    assert!(controller.orbit_enabled());
    assert!(!controller.drag_active());
}

#[test]
fn missed_pick_leaves_orbit_alone() {
    let mut controller = mount(MaterialData::phong(Color::WHITE));
    // Far corner of the screen: the ray passes well outside the unit cube.
    assert!(controller.begin_drag(0.95, 0.95).is_none());
    assert!(controller.orbit_enabled());
    assert!(!controller.drag_active());
}

#[test]
fn drag_highlights_and_clears_emissive() {
    let mut controller = mount(MaterialData::phong(Color::WHITE));
    let material = controller.content().expect("content").material;
    controller.begin_drag(0.0, 0.0);
    let emissive = controller
        .resources()
        .and_then(|r| r.material(material))
        .and_then(|m| m.emissive)
        .expect("phong carries an emissive term");
    assert_eq!(emissive, Color::from_hex(0x333333));
    controller.end_drag();
    let emissive = controller
        .resources()
        .and_then(|r| r.material(material))
        .and_then(|m| m.emissive)
        .expect("still present");
    assert_eq!(emissive, Color::BLACK);
}

#[test]
fn emissive_free_material_is_skipped_not_faulted() {
    let mut controller = mount(MaterialData::normal());
    let material = controller.content().expect("content").material;
    assert!(controller.begin_drag(0.0, 0.0).is_some());
    let emissive = controller
        .resources()
        .and_then(|r| r.material(material))
        .and_then(|m| m.emissive);
    assert!(emissive.is_none());
    controller.end_drag();
    assert!(controller.orbit_enabled());
}

#[test]
fn dragging_moves_the_node_on_the_pick_plane() {
    let mut controller = mount(MaterialData::phong(Color::WHITE));
    let cube = controller.content().expect("content").cube;
    controller.begin_drag(0.0, 0.0);
    controller.drag_to(0.3, 0.0);
    let translation = controller
        .scene()
        .and_then(|s| s.get(cube))
        .expect("node")
        .transform
        .translation;
    assert!(translation.x > 0.1, "node follows the pointer: {translation}");
    assert!(translation.y.abs() < 1e-3);
}

#[test]
fn orbit_input_during_drag_is_discarded() {
    let mut controller = mount(MaterialData::phong(Color::WHITE));
    let eye_before = controller.camera().expect("camera").eye;
    controller.begin_drag(0.0, 0.0);
    controller.orbit_rotate(1.0, 0.0);
    controller.on_frame();
    controller.end_drag();
    controller.on_frame();
    let eye_after = controller.camera().expect("camera").eye;
    assert!((eye_after - eye_before).length() < 1e-4, "ignored input must not move the camera");
}
