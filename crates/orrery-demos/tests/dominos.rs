// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Domino page: index correspondence between rigid bodies and drawables,
//! the tip impulse, and full-teardown reset.

use glam::Vec3;
use orrery_core::{Container, NoAssets, SurfaceController};
use orrery_demos::dominos::{self, DominoConfig, DominoDemo};
use orrery_dry_tests::{pump, FakeRenderPort, PortLog};

fn mount() -> (SurfaceController<FakeRenderPort, DominoDemo>, PortLog) {
    let (port, log) = FakeRenderPort::new();
    let controller = dominos::mount(&Container::window(1280, 720), port, Box::new(NoAssets))
        .expect("mounted");
    (controller, log)
}

/// Drawable `i`'s transform equals rigid body `i`'s pose after any number
/// of steps — the pairing never permutes.
#[test]
fn drawables_mirror_their_bodies_by_index() {
    let (mut controller, _log) = mount();
    for ticks in [1usize, 9, 40] {
        pump(&mut controller, ticks);
        let content = controller.content().expect("content");
        let count = content.domino_count();
        assert!(count > 60);
        let poses: Vec<_> = (0..count)
            .map(|i| content.body_pose(i).expect("body"))
            .collect();
        let nodes: Vec<_> = (0..count)
            .map(|i| content.domino_node(i).expect("node"))
            .collect();
        let scene = controller.scene().expect("scene");
        for (i, node) in nodes.iter().enumerate() {
            let transform = scene.get(*node).expect("live node").transform;
            let (position, rotation) = poses[i];
            assert!(
                (transform.translation - position).length() < 1e-5,
                "domino {i} translation diverged"
            );
            let dot = transform.rotation.dot(rotation).abs();
            assert!(dot > 1.0 - 1e-5, "domino {i} rotation diverged (dot {dot})");
        }
    }
}

#[test]
fn the_first_domino_starts_falling() {
    let (mut controller, _log) = mount();
    let upright = controller
        .content()
        .and_then(|c| c.body_pose(0))
        .expect("pose")
        .1;
    pump(&mut controller, 30);
    let tipped = controller
        .content()
        .and_then(|c| c.body_pose(0))
        .expect("pose")
        .1;
    let drift = upright.dot(tipped).abs();
    assert!(drift < 1.0 - 1e-4, "the tip impulse must rotate domino 0");
}

#[test]
fn far_dominos_stay_upright_early_on() {
    let (mut controller, _log) = mount();
    let count = controller.content().expect("content").domino_count();
    let before = controller
        .content()
        .and_then(|c| c.body_pose(count - 1))
        .expect("pose");
    pump(&mut controller, 5);
    let after = controller
        .content()
        .and_then(|c| c.body_pose(count - 1))
        .expect("pose");
    assert!(
        (before.0 - after.0).length() < 0.05,
        "the chain cannot reach the last domino in five steps"
    );
}

#[test]
fn gravity_is_adjustable_mid_run() {
    let (mut controller, _log) = mount();
    pump(&mut controller, 2);
    let content = controller.content_mut().expect("content");
    content.set_gravity(Vec3::new(0.0, -2.0, 0.0));
    assert_eq!(content.gravity(), Vec3::new(0.0, -2.0, 0.0));
    pump(&mut controller, 2);
}

/// Reset is dispose + fresh mount: the new page starts from the initial
/// layout, not from the old world's state.
#[test]
fn reset_rebuilds_from_scratch() {
    let (mut controller, _log) = mount();
    let initial = controller
        .content()
        .and_then(|c| c.body_pose(0))
        .expect("pose");
    pump(&mut controller, 60);
    let fallen = controller
        .content()
        .and_then(|c| c.body_pose(0))
        .expect("pose");
    assert!((initial.1.dot(fallen.1)).abs() < 1.0 - 1e-4);

    controller.dispose();
    let (port, _log2) = FakeRenderPort::new();
    let mut fresh = dominos::mount_with(
        &Container::window(1280, 720),
        port,
        Box::new(NoAssets),
        DominoConfig::default(),
    )
    .expect("remounted");
    let reborn = fresh
        .content()
        .and_then(|c| c.body_pose(0))
        .expect("pose");
    assert!((reborn.0 - initial.0).length() < 1e-5);
    assert!(reborn.1.dot(initial.1).abs() > 1.0 - 1e-5);
    pump(&mut fresh, 1);
}
