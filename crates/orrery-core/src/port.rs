// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ports: the seams between the lifecycle core and host adapters.

use crate::{
    camera::PerspectiveCamera,
    error::SurfaceError,
    resources::{Resources, TextureHandle},
    scene::Scene,
};

/// Output side of a surface. One implementation per backend, one instance
/// per mounted page — output is never shared across pages.
pub trait RenderPort {
    /// Resize the output buffer. Always called together with a camera
    /// aspect update, never alone.
    fn set_size(&mut self, width: u32, height: u32);

    /// Forward the surface's shadow setting. Backends without a shadow pass
    /// may ignore it.
    fn set_shadows(&mut self, _enabled: bool) {}

    /// Draw one frame of the scene through the camera.
    fn draw(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        resources: &Resources,
    ) -> Result<(), SurfaceError>;

    /// Drop backend copies of every live resource in the registry. Called
    /// during teardown before the registry itself is cleared.
    fn release(&mut self, resources: &Resources);

    /// Release the backend context.
    fn dispose(&mut self);

    /// Remove the output from its container, if still attached. Must
    /// tolerate the host having removed it already.
    fn detach(&mut self);
}

/// Result of polling a one-shot asset load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    /// Still loading; poll again next tick.
    Pending,
    /// Loaded and registered; the handle is stable across further polls.
    Ready(TextureHandle),
    /// Load failed; the status is final. Fire-once, fail-silent.
    Failed,
}

/// One-shot async asset loading, polled from the frame loop. Once a load has
/// resolved, every further poll for the same path returns the same status.
pub trait AssetPort {
    /// Poll a texture load. On `Ready` the decoded pixels have been
    /// registered into `resources`.
    fn poll_texture(&mut self, path: &str, resources: &mut Resources) -> AssetStatus;
}

/// Asset port for pages that load nothing; every poll fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAssets;

impl AssetPort for NoAssets {
    fn poll_texture(&mut self, _path: &str, _resources: &mut Resources) -> AssetStatus {
        AssetStatus::Failed
    }
}
