// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Resize contract: camera aspect and output size move together, zero-area
//! resizes are skipped.

use approx::assert_relative_eq;
use orrery_core::{Container, NoAssets, SurfaceConfig, SurfaceController};
use orrery_dry_tests::{pump, FakeRenderPort, PortEvent, PortLog};
use proptest::prelude::*;

fn mount(width: u32, height: u32) -> (SurfaceController<FakeRenderPort, ()>, PortLog) {
    let (port, log) = FakeRenderPort::new();
    let controller = SurfaceController::acquire(
        &Container::window(width, height),
        SurfaceConfig::default(),
        port,
        Box::new(NoAssets),
        |_cx| (),
    )
    .expect("mounted");
    (controller, log)
}

#[test]
fn zero_dimension_resize_is_skipped() {
    let (mut controller, log) = mount(800, 600);
    let aspect_before = controller.camera().expect("camera").aspect;
    let events_before = log.borrow().len();
    controller.resize(0, 600);
    controller.resize(800, 0);
    controller.resize(0, 0);
    assert_relative_eq!(controller.camera().expect("camera").aspect, aspect_before);
    assert_eq!(log.borrow().len(), events_before, "no port call for a zero-area resize");
}

#[test]
fn resize_after_dispose_is_a_noop() {
    let (mut controller, log) = mount(800, 600);
    controller.dispose();
    let events_before = log.borrow().len();
    controller.resize(1024, 768);
    assert_eq!(log.borrow().len(), events_before);
}

#[test]
fn draws_never_see_a_half_applied_resize() {
    let (mut controller, log) = mount(640, 480);
    pump(&mut controller, 1);
    controller.resize(1920, 1080);
    pump(&mut controller, 1);
    controller.resize(0, 1080); // skipped
    pump(&mut controller, 1);
    controller.resize(300, 900);
    pump(&mut controller, 1);
    for ev in log.borrow().iter() {
        if let PortEvent::Draw(snap) = ev {
            let (w, h) = snap.size;
            assert_relative_eq!(snap.aspect, w as f32 / h as f32, epsilon = 1e-5);
        }
    }
}

proptest! {
    #[test]
    fn valid_resizes_update_aspect_and_output_together(
        w in 1u32..4000,
        h in 1u32..4000,
    ) {
        let (mut controller, log) = mount(512, 512);
        controller.resize(w, h);
        let camera = controller.camera().expect("camera");
        prop_assert!((camera.aspect - w as f32 / h as f32).abs() < 1e-5);
        let last_size = log.borrow().iter().rev().find_map(|ev| match ev {
            PortEvent::SetSize(sw, sh) => Some((*sw, *sh)),
            _ => None,
        });
        prop_assert_eq!(last_size, Some((w, h)));
    }

    #[test]
    fn zero_area_resizes_never_change_state(
        other in 0u32..4000,
        zero_width in any::<bool>(),
    ) {
        let (w, h) = if zero_width { (0, other) } else { (other, 0) };
        let (mut controller, log) = mount(512, 512);
        let before = log.borrow().len();
        controller.resize(w, h);
        prop_assert!((controller.camera().expect("camera").aspect - 1.0).abs() < 1e-6);
        prop_assert_eq!(log.borrow().len(), before);
    }
}
