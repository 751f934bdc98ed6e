// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rotate page: trigger steps the target by a quarter turn; the rendered
//! angle converges without overshoot.

use approx::assert_relative_eq;
use orrery_core::{Container, NoAssets, SurfaceController};
use orrery_demos::rotate::{self, RotateDemo};
use orrery_dry_tests::{pump, FakeRenderPort};
use std::f32::consts::FRAC_PI_2;

fn mount() -> SurfaceController<FakeRenderPort, RotateDemo> {
    let (port, _log) = FakeRenderPort::new();
    rotate::mount(&Container::window(800, 600), port, Box::new(NoAssets)).expect("mounted")
}

#[test]
fn one_trigger_sets_the_target_to_a_quarter_turn() {
    let mut controller = mount();
    assert_relative_eq!(controller.content().expect("content").target(), 0.0);
    controller
        .content_mut()
        .expect("content")
        .trigger_quarter_turn();
    assert_relative_eq!(controller.content().expect("content").target(), FRAC_PI_2);
}

#[test]
fn angle_converges_to_the_target_without_overshoot() {
    let mut controller = mount();
    controller
        .content_mut()
        .expect("content")
        .trigger_quarter_turn();
    let mut last = 0.0_f32;
    for _ in 0..240 {
        pump(&mut controller, 1);
        let angle = controller.content().expect("content").angle();
        assert!(angle >= last - f32::EPSILON, "angle regressed");
        assert!(angle <= FRAC_PI_2 + 1e-6, "angle overshot the target");
        // Per-tick motion is bounded by the lerp factor times the gap.
        assert!(angle - last <= 0.08 * FRAC_PI_2 + 1e-6);
        last = angle;
    }
    assert_relative_eq!(last, FRAC_PI_2, epsilon = 1e-3);
}

#[test]
fn triggers_accumulate() {
    let mut controller = mount();
    for _ in 0..3 {
        controller
            .content_mut()
            .expect("content")
            .trigger_quarter_turn();
    }
    assert_relative_eq!(
        controller.content().expect("content").target(),
        3.0 * FRAC_PI_2
    );
    pump(&mut controller, 400);
    assert_relative_eq!(
        controller.content().expect("content").angle(),
        3.0 * FRAC_PI_2,
        epsilon = 1e-3
    );
}

#[test]
fn idle_page_holds_its_angle() {
    let mut controller = mount();
    pump(&mut controller, 50);
    assert_relative_eq!(controller.content().expect("content").angle(), 0.0);
}
