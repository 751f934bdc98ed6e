// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Drag page: the full orbit/drag exclusivity scenario over the cube grid.

use orrery_core::{Container, NoAssets, SurfaceController};
use orrery_demos::drag::{self, DragDemo, DRAG_COUNT};
use orrery_dry_tests::{pump, FakeRenderPort};

fn mount() -> SurfaceController<FakeRenderPort, DragDemo> {
    let (port, _log) = FakeRenderPort::new();
    drag::mount(&Container::window(1200, 800), port, Box::new(NoAssets)).expect("mounted")
}

#[test]
fn the_grid_spawns_with_both_controls_armed() {
    let controller = mount();
    assert_eq!(controller.content().expect("content").cubes().len(), DRAG_COUNT);
    assert!(controller.orbit_enabled());
    assert!(!controller.drag_active());
}

/// Begin drag on a cube → orbit disabled; release → orbit restored.
#[test]
fn drag_scenario_toggles_orbit() {
    let mut controller = mount();
    pump(&mut controller, 1);
    // Sweep the screen until the ray lands on some cube; with 1000 cubes in
    // a 10-unit spread, the center region is dense.
    let mut started = false;
    'outer: for ix in -4..=4 {
        for iy in -4..=4 {
            if controller.begin_drag(ix as f32 * 0.1, iy as f32 * 0.1).is_some() {
                started = true;
                break 'outer;
            }
        }
    }
    assert!(started, "some cube must sit under one of the probe rays");
    assert!(!controller.orbit_enabled());
    pump(&mut controller, 2);
    assert!(!controller.orbit_enabled(), "orbit stays off across ticks");
    controller.end_drag();
    assert!(controller.orbit_enabled());
}

#[test]
fn shadow_floor_carries_no_emissive_capability() {
    let controller = mount();
    let scene = controller.scene().expect("scene");
    let resources = controller.resources().expect("resources");
    let shadow_materials = scene
        .iter()
        .filter_map(|(_, node)| match node.drawable {
            orrery_core::Drawable::Mesh { material, .. } => resources.material(material),
            _ => None,
        })
        .filter(|m| m.shading == orrery_core::Shading::Shadow)
        .inspect(|m| assert!(m.emissive.is_none()))
        .count();
    assert_eq!(shadow_materials, 1);
}
