// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! orrery-viewer: interactive host for the demo pages. Main wires App into
//! winit.

use anyhow::Result;
use egui_winit::winit::event_loop::EventLoop;

mod app;
mod app_events;
mod assets;
mod config;
mod gpu;
mod input;
mod pages;
mod perf;
mod port;
mod prefs;
mod ui;
mod ui_state;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .init();
    let event_loop = EventLoop::new()?;
    let mut app = app::App::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}
