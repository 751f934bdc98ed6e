// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Input handling: map winit pointer events onto the page's controls.

use crate::pages::Page;
use crate::ui_state::UiEvent;
use egui_winit::winit::{
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

/// Pointer-drag gain: a full-screen sweep orbits roughly half a turn.
const ORBIT_GAIN: f32 = 1.6;

/// Pointer state carried between events.
#[derive(Debug, Default)]
pub struct InputState {
    cursor: Option<(f32, f32)>,
    left_down: bool,
}

/// Feed one window event into the mounted page. Returns a UI event when the
/// input asks for an app-level action.
pub fn handle_window_event(
    event: &WindowEvent,
    window: &Window,
    page: Option<&mut Page>,
    state: &mut InputState,
) -> Option<UiEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            if let PhysicalKey::Code(KeyCode::Escape) = event.physical_key {
                if event.state == ElementState::Pressed {
                    return Some(UiEvent::ShutdownRequested);
                }
            }
            None
        }
        WindowEvent::CursorMoved { position, .. } => {
            let size = window.inner_size();
            if size.width == 0 || size.height == 0 {
                return None;
            }
            let ndc = (
                position.x as f32 / size.width as f32 * 2.0 - 1.0,
                1.0 - position.y as f32 / size.height as f32 * 2.0,
            );
            let prev = state.cursor.replace(ndc);
            let page = page?;
            if state.left_down {
                if page.drag_active() {
                    page.drag_to(ndc.0, ndc.1);
                } else if let Some((px, py)) = prev {
                    page.orbit_rotate((px - ndc.0) * ORBIT_GAIN, (ndc.1 - py) * ORBIT_GAIN);
                }
            }
            None
        }
        WindowEvent::MouseInput {
            state: button_state,
            button: MouseButton::Left,
            ..
        } => {
            let page = page?;
            match button_state {
                ElementState::Pressed => {
                    state.left_down = true;
                    if let Some((x, y)) = state.cursor {
                        // Falls through to orbit when nothing is picked.
                        page.begin_drag(x, y);
                    }
                }
                ElementState::Released => {
                    state.left_down = false;
                    page.end_drag();
                }
            }
            None
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let y: f32 = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
            };
            page?.orbit_zoom(1.0 - y * 0.05);
            None
        }
        _ => None,
    }
}
