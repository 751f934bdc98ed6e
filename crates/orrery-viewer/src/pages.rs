// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One mounted demo page at a time. Switching pages is a full dispose of
//! the old controller followed by a fresh mount — the router analog.

use crate::assets::FsAssets;
use crate::port::{OverlayFrame, WgpuPort};
use anyhow::Result;
use egui_winit::winit::window::Window;
use orrery_core::{AssetPort, Container, SurfaceController};
use orrery_demos::{cube, dominos, drag, group, rain, rotate, DemoKind};

/// Asset root, relative to the working directory.
const ASSET_ROOT: &str = "assets";

/// The currently mounted page.
pub enum Page {
    /// Spinning cube.
    Cube(SurfaceController<WgpuPort, cube::CubeDemo>),
    /// Lerp-rotated cube.
    Rotate(SurfaceController<WgpuPort, rotate::RotateDemo>),
    /// 5000-cube group.
    Group(SurfaceController<WgpuPort, group::GroupDemo>),
    /// Particle rain.
    Rain(SurfaceController<WgpuPort, rain::RainDemo>),
    /// Drag-and-drop cube grid.
    Drag(SurfaceController<WgpuPort, drag::DragDemo>),
    /// Domino chain.
    Dominos(SurfaceController<WgpuPort, dominos::DominoDemo>),
}

/// Dispatch a controller method across every page variant.
macro_rules! each_page {
    ($self:expr, $c:ident => $body:expr) => {
        match $self {
            Page::Cube($c) => $body,
            Page::Rotate($c) => $body,
            Page::Group($c) => $body,
            Page::Rain($c) => $body,
            Page::Drag($c) => $body,
            Page::Dominos($c) => $body,
        }
    };
}

impl Page {
    /// Mount `kind` into the window. Returns `Ok(None)` when the container
    /// is not available (mirrors the skipped-construction contract).
    pub fn mount(kind: DemoKind, window: &'static Window, vsync: bool) -> Result<Option<Page>> {
        let size = window.inner_size();
        let container = Container::window(size.width, size.height);
        let port = WgpuPort::new(window, vsync)?;
        let assets: Box<dyn AssetPort> = Box::new(FsAssets::new(ASSET_ROOT));
        Ok(match kind {
            DemoKind::Cube => cube::mount(&container, port, assets).map(Page::Cube),
            DemoKind::Rotate => rotate::mount(&container, port, assets).map(Page::Rotate),
            DemoKind::Group => group::mount(&container, port, assets).map(Page::Group),
            DemoKind::Rain => rain::mount(&container, port, assets).map(Page::Rain),
            DemoKind::Drag => drag::mount(&container, port, assets).map(Page::Drag),
            DemoKind::Dominos => dominos::mount(&container, port, assets).map(Page::Dominos),
        })
    }

    /// Which demo this page is.
    pub fn kind(&self) -> DemoKind {
        match self {
            Page::Cube(_) => DemoKind::Cube,
            Page::Rotate(_) => DemoKind::Rotate,
            Page::Group(_) => DemoKind::Group,
            Page::Rain(_) => DemoKind::Rain,
            Page::Drag(_) => DemoKind::Drag,
            Page::Dominos(_) => DemoKind::Dominos,
        }
    }

    /// Drive one host refresh callback.
    pub fn on_frame(&mut self) -> bool {
        each_page!(self, c => c.on_frame())
    }

    /// Forward a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        each_page!(self, c => c.resize(width, height));
    }

    /// Tear the page down now (also happens on drop).
    pub fn dispose(&mut self) {
        each_page!(self, c => c.dispose());
    }

    /// Hand this frame's egui output to the page's port.
    pub fn set_overlay(&mut self, overlay: OverlayFrame) {
        if let Some(port) = each_page!(self, c => c.renderer_mut()) {
            port.set_overlay(overlay);
        }
    }

    /// Orbit rotation input.
    pub fn orbit_rotate(&mut self, dx: f32, dy: f32) {
        each_page!(self, c => c.orbit_rotate(dx, dy));
    }

    /// Orbit zoom input.
    pub fn orbit_zoom(&mut self, factor: f32) {
        each_page!(self, c => c.orbit_zoom(factor));
    }

    /// Try to begin a drag; true when a node was picked.
    pub fn begin_drag(&mut self, ndc_x: f32, ndc_y: f32) -> bool {
        each_page!(self, c => c.begin_drag(ndc_x, ndc_y).is_some())
    }

    /// Continue an active drag.
    pub fn drag_to(&mut self, ndc_x: f32, ndc_y: f32) {
        each_page!(self, c => c.drag_to(ndc_x, ndc_y));
    }

    /// End an active drag.
    pub fn end_drag(&mut self) {
        each_page!(self, c => c.end_drag());
    }

    /// Whether a drag is in progress.
    pub fn drag_active(&self) -> bool {
        each_page!(self, c => c.drag_active())
    }
}
