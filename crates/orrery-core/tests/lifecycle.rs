// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Lifecycle contract: construction skip, tick ordering, idempotent
//! teardown, post-dispose inertness.

use glam::Vec3;
use orrery_core::{
    Animate, Color, Container, FrameCx, GeometryData, MaterialData, NoAssets, Node, NodeId,
    SurfaceConfig, SurfaceController,
};
use orrery_dry_tests::{pump, FakeRenderPort, PortEvent, PortLog};

/// Content that slides its node +x by 0.5 per tick.
struct Slider {
    node: NodeId,
    distance: f32,
}

impl Animate for Slider {
    fn advance(&mut self, cx: &mut FrameCx<'_>) {
        self.distance += 0.5;
        if let Some(node) = cx.scene.get_mut(self.node) {
            node.transform.translation = Vec3::new(self.distance, 0.0, 0.0);
        }
    }
}

fn mount(
    container: &Container,
) -> (Option<SurfaceController<FakeRenderPort, Slider>>, PortLog) {
    let (port, log) = FakeRenderPort::new();
    let controller = SurfaceController::acquire(
        container,
        SurfaceConfig::default(),
        port,
        Box::new(NoAssets),
        |cx| {
            let geometry = cx.resources.create_geometry(GeometryData::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            });
            let material = cx
                .resources
                .create_material(MaterialData::standard(Color::WHITE));
            let node = cx.scene.insert(Node::mesh(geometry, material));
            Slider {
                node,
                distance: 0.0,
            }
        },
    );
    (controller, log)
}

fn tags(log: &PortLog) -> Vec<&'static str> {
    log.borrow().iter().map(PortEvent::tag).collect()
}

#[test]
fn absent_container_skips_construction_entirely() {
    let (controller, log) = mount(&Container::Absent);
    assert!(controller.is_none());
    assert!(log.borrow().is_empty(), "no port call may run for a skipped acquire");
}

#[test]
fn acquire_sizes_then_arms_the_first_tick() {
    let (controller, log) = mount(&Container::window(800, 600));
    let controller = controller.expect("mounted");
    assert!(controller.is_mounted());
    assert!(controller.pending_tick().is_some());
    assert_eq!(tags(&log), vec!["set_size", "set_shadows"]);
}

#[test]
fn state_advances_before_every_draw() {
    let (controller, log) = mount(&Container::window(640, 480));
    let mut controller = controller.expect("mounted");
    assert_eq!(pump(&mut controller, 3), 3);
    let log = log.borrow();
    let drawn_x: Vec<f32> = log
        .iter()
        .filter_map(|ev| match ev {
            PortEvent::Draw(snap) => Some(snap.mesh_transforms[0].w_axis.x),
            _ => None,
        })
        .collect();
    // Each draw sees that tick's update, never the previous tick's state.
    assert_eq!(drawn_x, vec![0.5, 1.0, 1.5]);
}

#[test]
fn each_tick_reissues_a_fresh_handle() {
    let (controller, _log) = mount(&Container::window(100, 100));
    let mut controller = controller.expect("mounted");
    let first = controller.pending_tick().expect("armed");
    controller.on_frame();
    let second = controller.pending_tick().expect("re-armed");
    assert_ne!(first, second);
}

#[test]
fn dispose_runs_reverse_teardown_order() {
    let (controller, log) = mount(&Container::window(320, 240));
    let mut controller = controller.expect("mounted");
    pump(&mut controller, 2);
    controller.dispose();
    let tags = tags(&log);
    let release = tags.iter().position(|t| *t == "release").expect("release");
    let dispose = tags.iter().position(|t| *t == "dispose").expect("dispose");
    let detach = tags.iter().position(|t| *t == "detach").expect("detach");
    assert!(release < dispose && dispose < detach);
    // The sweep still saw the live registry: geometry + material.
    let live = log.borrow().iter().find_map(|ev| match ev {
        PortEvent::Release { live } => Some(*live),
        _ => None,
    });
    assert_eq!(live, Some(2));
    assert!(controller.resources().is_none());
}

#[test]
fn dispose_twice_is_observably_identical_to_once() {
    let (controller, log) = mount(&Container::window(320, 240));
    let mut controller = controller.expect("mounted");
    controller.dispose();
    let after_first = tags(&log);
    controller.dispose();
    assert_eq!(tags(&log), after_first);
}

#[test]
fn refresh_callback_after_dispose_is_inert() {
    let (controller, log) = mount(&Container::window(320, 240));
    let mut controller = controller.expect("mounted");
    pump(&mut controller, 1);
    controller.dispose();
    let before = log.borrow().len();
    // The host delivering one more queued refresh callback must not reach
    // any update or draw logic.
    assert!(!controller.on_frame());
    assert_eq!(log.borrow().len(), before);
    assert!(controller.pending_tick().is_none());
}

#[test]
fn drop_tears_the_surface_down() {
    let (controller, log) = mount(&Container::window(320, 240));
    {
        let mut controller = controller.expect("mounted");
        pump(&mut controller, 1);
    }
    let tags = tags(&log);
    assert!(tags.contains(&"dispose"));
    assert!(tags.contains(&"detach"));
}

#[test]
fn failed_draws_do_not_stop_the_loop() {
    let (mut port, log) = FakeRenderPort::new();
    port.fail_draws = true;
    let mut controller = SurfaceController::acquire(
        &Container::window(64, 64),
        SurfaceConfig::default(),
        port,
        Box::new(NoAssets),
        |_cx| (),
    )
    .expect("mounted");
    assert_eq!(pump(&mut controller, 3), 3);
    let draws = log
        .borrow()
        .iter()
        .filter(|ev| matches!(ev, PortEvent::Draw(_)))
        .count();
    assert_eq!(draws, 3, "a failed draw is local; the next tick still runs");
}

#[test]
fn static_content_is_drawn_unmodified_every_tick() {
    let (port, log) = FakeRenderPort::new();
    let mut controller = SurfaceController::acquire(
        &Container::window(256, 256),
        SurfaceConfig::default(),
        port,
        Box::new(NoAssets),
        |cx| {
            let geometry = cx.resources.create_geometry(GeometryData::Plane {
                width: 8.0,
                height: 8.0,
            });
            let material = cx
                .resources
                .create_material(MaterialData::standard(Color::from_hex(0x222222)));
            cx.scene.insert(Node::mesh(geometry, material).at(Vec3::new(0.0, -3.0, 0.0)));
        },
    )
    .expect("mounted");
    pump(&mut controller, 2);
    let log = log.borrow();
    let transforms: Vec<_> = log
        .iter()
        .filter_map(|ev| match ev {
            PortEvent::Draw(snap) => Some(snap.mesh_transforms.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(transforms.len(), 2);
    assert_eq!(transforms[0], transforms[1]);
}
