// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! egui panels: the navbar and the per-demo controls.

use crate::ui_state::{UiEvent, UiState};
use orrery_demos::DemoKind;
use std::f32::consts::TAU;

/// Draw the chrome for one frame; returns the events the user produced.
pub fn draw(ctx: &egui::Context, ui_state: &UiState, fps: f32) -> Vec<UiEvent> {
    let mut events = Vec::new();

    egui::TopBottomPanel::top("navbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("orrery").strong());
            ui.separator();
            for kind in DemoKind::ALL {
                if ui
                    .selectable_label(kind == ui_state.demo, kind.label())
                    .clicked()
                {
                    events.push(UiEvent::DemoSelected(kind));
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{fps:5.1} fps"));
            });
        });
    });

    egui::SidePanel::left("controls")
        .resizable(false)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading(ui_state.demo.label());
            ui.separator();
            match ui_state.demo {
                DemoKind::Rotate => {
                    if ui.button("Rotate cube").clicked() {
                        events.push(UiEvent::RotateClicked);
                    }
                }
                DemoKind::Group => {
                    group_controls(ui, ui_state, &mut events);
                }
                DemoKind::Dominos => {
                    if ui.button("Reset").clicked() {
                        events.push(UiEvent::ResetClicked);
                    }
                    gravity_controls(ui, ui_state, &mut events);
                }
                DemoKind::Cube | DemoKind::Rain | DemoKind::Drag => {
                    ui.label("No controls for this page.");
                }
            }
            ui.separator();
            let mut vsync = ui_state.vsync;
            if ui.checkbox(&mut vsync, "vsync").changed() {
                events.push(UiEvent::VsyncToggled(vsync));
            }
        });

    events
}

fn gravity_controls(ui: &mut egui::Ui, ui_state: &UiState, events: &mut Vec<UiEvent>) {
    ui.collapsing("Gravity", |ui| {
        let mut gravity = ui_state.gravity;
        let mut changed = false;
        changed |= ui
            .add(egui::Slider::new(&mut gravity.x, -10.0..=10.0).text("x"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut gravity.y, -20.0..=0.0).text("y"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut gravity.z, -10.0..=10.0).text("z"))
            .changed();
        if changed {
            events.push(UiEvent::GravityChanged(gravity));
        }
    });
}

fn group_controls(ui: &mut egui::Ui, ui_state: &UiState, events: &mut Vec<UiEvent>) {
    ui.collapsing("Group controls", |ui| {
        let mut rotation = ui_state.group_rotation;
        let mut rotated = false;
        for (value, label) in [
            (&mut rotation.x, "rot x"),
            (&mut rotation.y, "rot y"),
            (&mut rotation.z, "rot z"),
        ] {
            rotated |= ui.add(egui::Slider::new(value, 0.0..=TAU).text(label)).changed();
        }
        if rotated {
            events.push(UiEvent::GroupRotationChanged(rotation));
        }

        let mut scale = ui_state.group_scale;
        let mut scaled = false;
        for (value, label) in [
            (&mut scale.x, "scale x"),
            (&mut scale.y, "scale y"),
            (&mut scale.z, "scale z"),
        ] {
            scaled |= ui.add(egui::Slider::new(value, 0.1..=5.0).text(label)).changed();
        }
        if scaled {
            events.push(UiEvent::GroupScaleChanged(scale));
        }
    });
}
