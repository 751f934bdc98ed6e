// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The demo pages, each a configuration of the `orrery-core` lifecycle:
//! a spinning cube, a lerp-rotated cube, a 5000-cube group, texture-gated
//! particle rain, a drag-and-drop cube grid, and a physics-driven domino
//! chain.
//!
//! Every page exposes a `mount` function that acquires a configured
//! [`orrery_core::SurfaceController`] over any render port, so the same
//! pages run under the wgpu viewer and under test doubles.

pub mod cube;
pub mod dominos;
pub mod drag;
pub mod group;
pub mod rain;
pub mod rotate;

mod placement;

use serde::{Deserialize, Serialize};

/// Identifies one demo page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemoKind {
    /// Spinning cube.
    Cube,
    /// Cube lerping toward a stepped target angle.
    Rotate,
    /// 5000-cube group transform.
    Group,
    /// Particle rain with a texture-gated point cloud.
    Rain,
    /// Drag-and-drop cube grid.
    Drag,
    /// Physics-driven domino chain.
    Dominos,
}

impl DemoKind {
    /// Every page, in navbar order.
    pub const ALL: [DemoKind; 6] = [
        DemoKind::Cube,
        DemoKind::Rotate,
        DemoKind::Group,
        DemoKind::Rain,
        DemoKind::Drag,
        DemoKind::Dominos,
    ];

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            DemoKind::Cube => "Cube",
            DemoKind::Rotate => "Rotate",
            DemoKind::Group => "Group",
            DemoKind::Rain => "Rain",
            DemoKind::Drag => "Drag",
            DemoKind::Dominos => "Dominos",
        }
    }
}

impl Default for DemoKind {
    fn default() -> Self {
        DemoKind::Cube
    }
}
