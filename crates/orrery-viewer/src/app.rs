// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Top-level application wiring and event loop handler.

use crate::{
    config::{ConfigService, FsConfigStore},
    input::InputState,
    pages::Page,
    perf::FrameClock,
    port::OverlayFrame,
    prefs::ViewerPrefs,
    ui,
    ui_state::{self, UiEffect, UiEvent, UiState},
};
use egui_winit::winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes},
};
use egui_winit::State as EguiWinitState;
use orrery_demos::DemoKind;
use tracing::warn;

const PREFS_KEY: &str = "viewer";

pub struct App {
    pub window: Option<&'static Window>,
    pub egui_ctx: egui::Context,
    pub egui_state: Option<EguiWinitState>,
    pub page: Option<Page>,
    pub ui: UiState,
    pub input: InputState,
    clock: FrameClock,
    config: Option<ConfigService<FsConfigStore>>,
    shutdown_requested: bool,
}

impl App {
    pub fn new() -> Self {
        let config = FsConfigStore::new().map(ConfigService::new).ok();
        if config.is_none() {
            warn!("config store unavailable; prefs won't persist this session");
        }
        let prefs = config
            .as_ref()
            .and_then(|c| c.load::<ViewerPrefs>(PREFS_KEY).ok())
            .flatten()
            .unwrap_or_default();
        Self {
            window: None,
            egui_ctx: egui::Context::default(),
            egui_state: None,
            page: None,
            ui: UiState::from_prefs(&prefs),
            input: InputState::default(),
            clock: FrameClock::default(),
            config,
            shutdown_requested: false,
        }
    }

    pub fn apply_ui_event(&mut self, ev: UiEvent) {
        let (next, effects) = ui_state::reduce(&self.ui, ev);
        self.ui = next;
        for fx in effects {
            self.run_effect(fx);
        }
    }

    fn run_effect(&mut self, fx: UiEffect) {
        match fx {
            UiEffect::Remount(kind) => self.remount(kind),
            UiEffect::SavePrefs => self.save_prefs(),
            UiEffect::RotateCube => {
                if let Some(Page::Rotate(controller)) = self.page.as_mut() {
                    if let Some(demo) = controller.content_mut() {
                        demo.trigger_quarter_turn();
                    }
                }
            }
            UiEffect::ApplyGravity(gravity) => {
                if let Some(Page::Dominos(controller)) = self.page.as_mut() {
                    if let Some(demo) = controller.content_mut() {
                        demo.set_gravity(gravity);
                    }
                }
            }
            UiEffect::ApplyGroupTransform { rotation, scale } => {
                if let Some(Page::Group(controller)) = self.page.as_mut() {
                    if let Some((scene, demo)) = controller.scene_and_content_mut() {
                        demo.set_rotation(scene, rotation);
                        demo.set_scale(scene, scale);
                    }
                }
            }
            UiEffect::Quit => self.shutdown_requested = true,
        }
    }

    /// Unmount the current page and mount `kind` fresh — the full teardown
    /// and reconstruction path, also used by Reset.
    fn remount(&mut self, kind: DemoKind) {
        let Some(window) = self.window else {
            return;
        };
        if let Some(mut page) = self.page.take() {
            page.dispose();
        }
        match Page::mount(kind, window, self.ui.vsync) {
            Ok(Some(page)) => self.page = Some(page),
            Ok(None) => warn!("page {kind:?} skipped: container not measurable"),
            Err(err) => warn!("mount {kind:?} failed: {err:#}"),
        }
    }

    fn save_prefs(&self) {
        if let Some(config) = &self.config {
            if let Err(err) = config.save(PREFS_KEY, &self.ui.to_prefs()) {
                warn!("prefs save failed: {err}");
            }
        }
    }

    fn frame(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        let Some(egui_state) = self.egui_state.as_mut() else {
            return;
        };
        let raw = egui_state.take_egui_input(window);
        let snapshot = self.ui.clone();
        let fps = self.clock.fps();
        let mut events = Vec::new();
        let full = self.egui_ctx.run(raw, |ctx| {
            events.extend(ui::draw(ctx, &snapshot, fps));
        });
        egui_state.handle_platform_output(window, full.platform_output);
        for ev in events {
            self.apply_ui_event(ev);
        }

        let size = window.inner_size();
        let paint_jobs = self
            .egui_ctx
            .tessellate(full.shapes, full.pixels_per_point);
        let screen_desc = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width.max(1), size.height.max(1)],
            pixels_per_point: full.pixels_per_point,
        };
        if let Some(page) = self.page.as_mut() {
            page.set_overlay(OverlayFrame {
                paint_jobs,
                textures_delta: full.textures_delta,
                screen_desc,
            });
            page.on_frame();
        }
        self.clock.tick();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title("Orrery Demos")
                    .with_visible(true),
            )
            .expect("window");
        let window: &'static Window = Box::leak(Box::new(window));
        self.window = Some(window);
        self.egui_state = Some(EguiWinitState::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            event_loop,
            None,
            None,
            None,
        ));
        self.remount(self.ui.demo);
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: egui_winit::winit::window::WindowId,
        event: WindowEvent,
    ) {
        self.handle_window_event(window_id, event);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            return;
        }
        if self.shutdown_requested {
            self.save_prefs();
            if let Some(mut page) = self.page.take() {
                page.dispose();
            }
            event_loop.exit();
            return;
        }
        self.frame();
    }
}
