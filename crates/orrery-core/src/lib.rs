// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Render-surface lifecycle core.
//!
//! One [`SurfaceController`] owns one rendering surface (camera + renderer +
//! scene root) for the lifetime of a mounted page:
//!
//! - [`SurfaceController::acquire`] builds the surface, its content, arms
//!   the first tick, and binds resize — or skips entirely when the host
//!   region is absent.
//! - [`SurfaceController::on_frame`] is the host's refresh callback: per
//!   tick, simulated state advances strictly before the draw.
//! - [`SurfaceController::dispose`] tears down in reverse creation order and
//!   is idempotent; `Drop` makes teardown unconditional.
//!
//! Rendering and asset loading are ports ([`RenderPort`], [`AssetPort`]);
//! hosts plug in a GPU adapter, tests plug in doubles.

mod animate;
mod camera;
mod controller;
mod controls;
mod error;
mod port;
mod resources;
mod scene;

pub use crate::animate::{lerp, Animate, FrameCx};
pub use crate::camera::{PerspectiveCamera, Ray};
pub use crate::controller::{
    BuildCx, Container, SurfaceConfig, SurfaceController, TickHandle,
};
pub use crate::controls::{Controls, OrbitControls};
pub use crate::error::SurfaceError;
pub use crate::port::{AssetPort, AssetStatus, NoAssets, RenderPort};
pub use crate::resources::{
    GeometryData, GeometryHandle, MaterialData, MaterialHandle, Resources, Shading, TextureData,
    TextureHandle,
};
pub use crate::scene::{Color, Drawable, Fog, Light, Node, NodeId, Scene, Transform};
