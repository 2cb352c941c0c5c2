use eframe::egui;

use crate::ImageEditorApp;
use crate::settings::{AlphaPolicy, CommitPolicy};

pub fn settings_window(app: &mut ImageEditorApp, ctx: &egui::Context) {
    let mut open = *app.show_settings_mut();
    if !open {
        return;
    }

    let mut export = false;
    let mut import = false;
    egui::Window::new("Settings")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| {
            let settings = app.settings_mut();

            egui::Grid::new("settings_grid")
                .num_columns(2)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Unchanged edits");
                    ui.horizontal(|ui| {
                        ui.radio_value(&mut settings.commit_policy, CommitPolicy::Always, "Record");
                        ui.radio_value(&mut settings.commit_policy, CommitPolicy::SkipUnchanged, "Skip");
                    });
                    ui.end_row();

                    ui.label("History limit");
                    ui.horizontal(|ui| {
                        let mut limited = settings.max_history.is_some();
                        if ui.checkbox(&mut limited, "").changed() {
                            settings.max_history = limited.then_some(50);
                        }
                        if let Some(max) = &mut settings.max_history {
                            ui.add(egui::DragValue::new(max).range(1..=1000).suffix(" snapshots"));
                        } else {
                            ui.weak("Unlimited");
                        }
                    });
                    ui.end_row();

                    ui.label("JPEG quality");
                    ui.add(egui::Slider::new(&mut settings.jpeg_quality, 1..=100));
                    ui.end_row();

                    ui.label("Transparency on export");
                    ui.horizontal(|ui| {
                        ui.radio_value(&mut settings.alpha_policy, AlphaPolicy::Flatten, "Flatten");
                        ui.radio_value(&mut settings.alpha_policy, AlphaPolicy::Reject, "Refuse");
                    });
                    ui.end_row();

                    ui.label("Background");
                    ui.color_edit_button_srgb(&mut settings.background);
                    ui.end_row();

                    ui.label("Draw color");
                    ui.color_edit_button_srgba_unmultiplied(&mut settings.draw_color);
                    ui.end_row();

                    ui.label("Preview");
                    ui.checkbox(&mut settings.upscale_preview, "Scale small images up");
                    ui.end_row();
                });

            ui.separator();
            ui.horizontal(|ui| {
                export = ui.button("Export…").clicked();
                import = ui.button("Import…").clicked();
                if ui.button("Reset").clicked() {
                    *settings = Default::default();
                }
            });
        });

    if export {
        app.export_settings();
    }
    if import {
        app.import_settings();
    }
    *app.show_settings_mut() = open;
}
