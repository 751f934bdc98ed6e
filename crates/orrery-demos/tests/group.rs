// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Group page: shared resources, parent-driven transforms, and static
//! content under a live orbit control.

use approx::assert_relative_eq;
use glam::Vec3;
use orrery_core::{Container, NoAssets, SurfaceController};
use orrery_demos::group::{self, GroupDemo, GROUP_COUNT, GROUP_RANGE};
use orrery_dry_tests::{pump, FakeRenderPort, PortEvent, PortLog};

fn mount() -> (SurfaceController<FakeRenderPort, GroupDemo>, PortLog) {
    let (port, log) = FakeRenderPort::new();
    let controller =
        group::mount(&Container::window(1600, 900), port, Box::new(NoAssets)).expect("mounted");
    (controller, log)
}

#[test]
fn the_swarm_shares_one_geometry_and_one_material() {
    let (controller, _log) = mount();
    // floor geometry + floor material + cube geometry + cube material
    assert_eq!(controller.resources().expect("resources").alive(), 4);
    // light + floor + group + 5000 cubes
    assert_eq!(controller.scene().expect("scene").len(), GROUP_COUNT + 3);
}

#[test]
fn cubes_spawn_inside_the_configured_range() {
    let (controller, _log) = mount();
    let content = controller.content().expect("content");
    let group = content.group();
    let scene = controller.scene().expect("scene");
    let half = GROUP_RANGE / 2.0;
    let mut seen = 0usize;
    for (_, node) in scene.iter() {
        if node.parent == Some(group) {
            seen += 1;
            let p = node.transform.translation;
            assert!(p.x.abs() <= half && p.y.abs() <= half && p.z.abs() <= half);
        }
    }
    assert_eq!(seen, GROUP_COUNT);
}

#[test]
fn group_scale_reaches_every_cube() {
    let (mut controller, log) = mount();
    pump(&mut controller, 1);
    let (scene, content) = controller.scene_and_content_mut().expect("mounted");
    content.set_scale(scene, Vec3::splat(2.0));
    pump(&mut controller, 1);
    let log = log.borrow();
    let draws: Vec<_> = log
        .iter()
        .filter_map(|ev| match ev {
            PortEvent::Draw(snap) => Some(snap),
            _ => None,
        })
        .collect();
    let before = &draws[draws.len() - 2].mesh_transforms;
    let after = &draws[draws.len() - 1].mesh_transforms;
    // Skip the floor (first mesh); every swarm cube's world position doubles.
    let mut scaled = 0usize;
    for (b, a) in before.iter().zip(after.iter()).skip(1) {
        let pb = b.w_axis.truncate();
        let pa = a.w_axis.truncate();
        if pb.length() > 1e-3 {
            assert_relative_eq!(pa.length(), pb.length() * 2.0, epsilon = 1e-3);
            scaled += 1;
        }
    }
    assert!(scaled > GROUP_COUNT / 2);
}

#[test]
fn group_rotation_is_externally_settable() {
    let (mut controller, _log) = mount();
    let (scene, content) = controller.scene_and_content_mut().expect("mounted");
    content.set_rotation(scene, Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
    let transform = controller
        .content()
        .and_then(|c| c.transform(controller.scene().expect("scene")))
        .expect("group transform");
    let rotated = transform.rotation * Vec3::X;
    assert_relative_eq!(rotated.z, -1.0, epsilon = 1e-5);
}

#[test]
fn static_swarm_draws_identically_while_camera_orbits() {
    let (mut controller, log) = mount();
    pump(&mut controller, 1);
    controller.orbit_rotate(0.3, 0.1);
    pump(&mut controller, 1);
    let log = log.borrow();
    let draws: Vec<_> = log
        .iter()
        .filter_map(|ev| match ev {
            PortEvent::Draw(snap) => Some(snap),
            _ => None,
        })
        .collect();
    assert_eq!(draws.len(), 2);
    // Node transforms are untouched by camera motion.
    assert_eq!(draws[0].mesh_transforms, draws[1].mesh_transforms);
}
