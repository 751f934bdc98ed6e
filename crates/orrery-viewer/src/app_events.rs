// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Window-event handling for the App.

use crate::{app::App, input, ui_state::UiEvent};
use egui_winit::winit::event::WindowEvent;

impl App {
    pub fn handle_window_event(
        &mut self,
        window_id: egui_winit::winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        let consumed = self
            .egui_state
            .as_mut()
            .map(|state| state.on_window_event(window, &event).consumed)
            .unwrap_or(false);

        match &event {
            WindowEvent::CloseRequested => {
                self.apply_ui_event(UiEvent::ShutdownRequested);
                return;
            }
            // Resize reaches the page even when egui claimed the event.
            WindowEvent::Resized(size) => {
                if let Some(page) = self.page.as_mut() {
                    page.resize(size.width, size.height);
                }
                return;
            }
            _ => {}
        }

        if consumed {
            return;
        }
        let outcome =
            input::handle_window_event(&event, window, self.page.as_mut(), &mut self.input);
        if let Some(ev) = outcome {
            self.apply_ui_event(ev);
        }
    }
}
