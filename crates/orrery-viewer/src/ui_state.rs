// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pure state transitions for the viewer UI (navbar, per-demo controls).

use crate::prefs::ViewerPrefs;
use glam::Vec3;
use orrery_demos::DemoKind;

/// Something the user did in the UI.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// A navbar entry was clicked.
    DemoSelected(DemoKind),
    /// The Reset button was clicked (dominos).
    ResetClicked,
    /// The Rotate button was clicked (rotate page).
    RotateClicked,
    /// A gravity slider moved (dominos).
    GravityChanged(Vec3),
    /// A group rotation slider moved.
    GroupRotationChanged(Vec3),
    /// A group scale slider moved.
    GroupScaleChanged(Vec3),
    /// Vsync checkbox toggled.
    VsyncToggled(bool),
    /// Close requested (window close button or Escape).
    ShutdownRequested,
}

/// Side effect the app must perform after a reduction.
#[derive(Debug, Clone)]
pub enum UiEffect {
    /// Dispose the current page and mount the named demo fresh.
    Remount(DemoKind),
    /// Persist preferences.
    SavePrefs,
    /// Trigger a quarter turn on the rotate page.
    RotateCube,
    /// Push the gravity vector into the domino page.
    ApplyGravity(Vec3),
    /// Push rotation + scale onto the group page's parent node.
    ApplyGroupTransform {
        /// Euler rotation.
        rotation: Vec3,
        /// Per-axis scale.
        scale: Vec3,
    },
    /// Exit the app.
    Quit,
}

/// UI state snapshot; transitions go through [`reduce`] only.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently selected demo.
    pub demo: DemoKind,
    /// Present in vsync mode.
    pub vsync: bool,
    /// Domino gravity slider values.
    pub gravity: Vec3,
    /// Group rotation slider values.
    pub group_rotation: Vec3,
    /// Group scale slider values.
    pub group_scale: Vec3,
}

impl UiState {
    /// Initial state from saved preferences.
    pub fn from_prefs(prefs: &ViewerPrefs) -> Self {
        Self {
            demo: prefs.demo,
            vsync: prefs.vsync,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            group_rotation: Vec3::ZERO,
            group_scale: Vec3::ONE,
        }
    }

    /// Current state as persistable preferences.
    pub fn to_prefs(&self) -> ViewerPrefs {
        ViewerPrefs {
            demo: self.demo,
            vsync: self.vsync,
        }
    }
}

/// Apply one event, returning the next state and the effects to run.
pub fn reduce(ui: &UiState, ev: UiEvent) -> (UiState, Vec<UiEffect>) {
    let mut next = ui.clone();
    let mut fx = Vec::new();
    match ev {
        UiEvent::DemoSelected(kind) => {
            if kind != ui.demo {
                next.demo = kind;
                // Slider state belongs to the page instance; a new mount
                // starts from the defaults, like a fresh route visit.
                next.gravity = Vec3::new(0.0, -9.81, 0.0);
                next.group_rotation = Vec3::ZERO;
                next.group_scale = Vec3::ONE;
                fx.push(UiEffect::Remount(kind));
                fx.push(UiEffect::SavePrefs);
            }
        }
        UiEvent::ResetClicked => {
            next.gravity = Vec3::new(0.0, -9.81, 0.0);
            fx.push(UiEffect::Remount(ui.demo));
        }
        UiEvent::RotateClicked => fx.push(UiEffect::RotateCube),
        UiEvent::GravityChanged(gravity) => {
            next.gravity = gravity;
            fx.push(UiEffect::ApplyGravity(gravity));
        }
        UiEvent::GroupRotationChanged(rotation) => {
            next.group_rotation = rotation;
            fx.push(UiEffect::ApplyGroupTransform {
                rotation,
                scale: ui.group_scale,
            });
        }
        UiEvent::GroupScaleChanged(scale) => {
            next.group_scale = scale;
            fx.push(UiEffect::ApplyGroupTransform {
                rotation: ui.group_rotation,
                scale,
            });
        }
        UiEvent::VsyncToggled(on) => {
            next.vsync = on;
            fx.push(UiEffect::SavePrefs);
            // Present mode is fixed at mount; apply it with a remount.
            fx.push(UiEffect::Remount(ui.demo));
        }
        UiEvent::ShutdownRequested => fx.push(UiEffect::Quit),
    }
    (next, fx)
}
