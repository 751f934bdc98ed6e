// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cube page: fixed per-tick spin applied before each draw.

use approx::assert_relative_eq;
use orrery_core::{Color, Container, NoAssets};
use orrery_demos::cube;
use orrery_dry_tests::{pump, FakeRenderPort};

#[test]
fn spin_advances_a_hundredth_radian_per_tick() {
    let (port, _log) = FakeRenderPort::new();
    let mut controller =
        cube::mount(&Container::window(640, 480), port, Box::new(NoAssets)).expect("mounted");
    pump(&mut controller, 100);
    assert_relative_eq!(
        controller.content().expect("content").angle_y(),
        1.0,
        epsilon = 1e-4
    );
}

#[test]
fn page_uses_its_configured_background() {
    let (port, _log) = FakeRenderPort::new();
    let controller =
        cube::mount(&Container::window(640, 480), port, Box::new(NoAssets)).expect("mounted");
    assert_eq!(
        controller.scene().expect("scene").background,
        Color::from_hex(0x202020)
    );
}

#[test]
fn absent_container_skips_the_page() {
    let (port, log) = FakeRenderPort::new();
    let controller = cube::mount(&Container::Absent, port, Box::new(NoAssets));
    assert!(controller.is_none());
    assert!(log.borrow().is_empty());
}
