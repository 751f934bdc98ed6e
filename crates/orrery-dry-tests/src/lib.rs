// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Orrery crates.
//!
//! - [`FakeRenderPort`] records every port call in order, so lifecycle tests
//!   can assert teardown ordering, idempotence, and post-dispose inertness.
//! - [`ScriptedAssets`] replays a programmed load sequence per path, so
//!   texture-gated content can be driven through pending/ready/failed.
//! - [`pump`] drives a controller through host refresh callbacks.

mod assets;
mod port;

pub use assets::{ScriptedAssets, ScriptedLoad};
pub use port::{DrawSnapshot, FakeRenderPort, PortEvent, PortLog};

use orrery_core::{Animate, RenderPort, SurfaceController};

/// Drive `ticks` host refresh callbacks; returns how many drew a frame.
pub fn pump<R: RenderPort, A: Animate>(
    controller: &mut SurfaceController<R, A>,
    ticks: usize,
) -> usize {
    (0..ticks).filter(|_| controller.on_frame()).count()
}

/// A 1×1 white RGBA texture payload.
pub fn white_pixel() -> orrery_core::TextureData {
    orrery_core::TextureData {
        width: 1,
        height: 1,
        rgba: vec![0xff; 4],
    }
}
