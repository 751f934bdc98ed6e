// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rain page: deferred start behind the texture load, fail-silent
//! degradation, and the wrap-around invariant.

use orrery_core::{Container, GeometryData, SurfaceController};
use orrery_demos::rain::{self, RainDemo, RainParams};
use orrery_dry_tests::{pump, FakeRenderPort, PortEvent, PortLog, ScriptedAssets};
use proptest::prelude::*;

const SPRITE: &str = "textures/particles/raindrop.png";

fn small_params(count: usize, seed: u64) -> RainParams {
    RainParams {
        count,
        seed,
        ..RainParams::default()
    }
}

fn mount(
    assets: ScriptedAssets,
    params: RainParams,
) -> (SurfaceController<FakeRenderPort, RainDemo>, PortLog) {
    let (port, log) = FakeRenderPort::new();
    let controller = rain::mount_with(
        &Container::window(1280, 720),
        port,
        Box::new(assets),
        params,
    )
    .expect("mounted");
    (controller, log)
}

fn positions(controller: &SurfaceController<FakeRenderPort, RainDemo>) -> Vec<glam::Vec3> {
    let geometry = controller
        .content()
        .and_then(RainDemo::geometry)
        .expect("cloud online");
    match controller
        .resources()
        .and_then(|r| r.geometry(geometry))
        .expect("geometry")
    {
        GeometryData::PointCloud { positions, .. } => positions.clone(),
        _ => panic!("rain geometry must be a point cloud"),
    }
}

#[test]
fn cloud_insertion_waits_for_the_texture() {
    let assets = ScriptedAssets::new().delayed(SPRITE, 3);
    let (mut controller, log) = mount(assets, small_params(50, 1));
    pump(&mut controller, 3);
    assert!(!controller.content().expect("content").is_running());
    // The surface itself kept ticking while the load was pending.
    let draws = log
        .borrow()
        .iter()
        .filter(|ev| matches!(ev, PortEvent::Draw(_)))
        .count();
    assert_eq!(draws, 3);

    pump(&mut controller, 1);
    assert!(controller.content().expect("content").is_running());
    assert_eq!(positions(&controller).len(), 50);
}

#[test]
fn failed_load_keeps_the_rest_of_the_surface_ticking() {
    let assets = ScriptedAssets::new().failing(SPRITE);
    let (mut controller, log) = mount(assets, small_params(50, 2));
    pump(&mut controller, 5);
    let content = controller.content().expect("content");
    assert!(content.is_failed());
    assert!(!content.is_running());
    // Fire-once, fail-silent: no cloud, but every tick still drew.
    let draws = log
        .borrow()
        .iter()
        .filter(|ev| matches!(ev, PortEvent::Draw(_)))
        .count();
    assert_eq!(draws, 5);
    assert!(controller.scene().expect("scene").is_empty());
}

#[test]
fn x_wrap_reenters_at_the_opposite_bound_in_the_same_tick() {
    let assets = ScriptedAssets::new().immediate(SPRITE);
    let (mut controller, _log) = mount(assets, small_params(200, 3));
    pump(&mut controller, 1); // spawn
    let half = rain::RAIN_RANGE / 2.0;
    for _ in 0..2000 {
        pump(&mut controller, 1);
        for p in positions(&controller) {
            assert!(
                (-half..=half).contains(&p.x),
                "x escaped the wrap bound: {p}"
            );
        }
    }
}

#[test]
fn fall_reenters_at_the_top_only_from_below() {
    let assets = ScriptedAssets::new().immediate(SPRITE);
    let (mut controller, _log) = mount(assets, small_params(300, 4));
    pump(&mut controller, 1); // spawn
    let half = rain::RAIN_RANGE / 2.0;
    let mut wrapped = 0usize;
    let mut previous = positions(&controller);
    for _ in 0..800 {
        pump(&mut controller, 1);
        let current = positions(&controller);
        for (before, after) in previous.iter().zip(current.iter()) {
            if after.y > before.y {
                // The only upward move is the re-entry jump to the top.
                assert!((after.y - half).abs() < 1e-4, "unexpected rise to {}", after.y);
                wrapped += 1;
            }
            assert!(after.y <= half + 1e-4);
        }
        previous = current;
    }
    assert!(wrapped > 0, "800 ticks should wrap at least one particle");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn x_never_escapes_for_any_seed(seed in 0u64..1024, ticks in 1usize..400) {
        let assets = ScriptedAssets::new().immediate(SPRITE);
        let (mut controller, _log) = mount(assets, small_params(64, seed));
        pump(&mut controller, 1 + ticks);
        let half = rain::RAIN_RANGE / 2.0;
        for p in positions(&controller) {
            prop_assert!((-half..=half).contains(&p.x));
        }
    }
}
