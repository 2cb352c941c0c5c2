use eframe::egui;

use crate::ImageEditorApp;
use crate::command::{Menu, in_menu};
use crate::transform::ExportFormat;

pub fn menu_bar(app: &mut ImageEditorApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            let loaded = app.document().is_loaded();

            ui.menu_button("File", |ui| {
                if ui.add(egui::Button::new("Open…").shortcut_text("Ctrl+O")).clicked() {
                    ui.close_menu();
                    app.open(ctx);
                }
                if ui
                    .add_enabled(loaded, egui::Button::new("Save…").shortcut_text("Ctrl+S"))
                    .clicked()
                {
                    ui.close_menu();
                    app.save_image(ctx, None);
                }
                for format in ExportFormat::ALL {
                    let label = format!("Export {}…", format.label());
                    if ui.add_enabled(loaded, egui::Button::new(label)).clicked() {
                        ui.close_menu();
                        app.save_image(ctx, Some(format));
                    }
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                let history = app.document().history();
                let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
                if ui
                    .add_enabled(can_undo, egui::Button::new("Undo").shortcut_text("Ctrl+Z"))
                    .clicked()
                {
                    ui.close_menu();
                    app.undo(ctx);
                }
                if ui
                    .add_enabled(can_redo, egui::Button::new("Redo").shortcut_text("Ctrl+Y"))
                    .clicked()
                {
                    ui.close_menu();
                    app.redo(ctx);
                }
                ui.separator();
                if ui.button("Settings…").clicked() {
                    ui.close_menu();
                    *app.show_settings_mut() = true;
                }
            });

            for menu in Menu::ALL {
                ui.menu_button(menu.label(), |ui| {
                    for command in in_menu(menu) {
                        if ui.add_enabled(loaded, egui::Button::new(command.label)).clicked() {
                            ui.close_menu();
                            app.run_command(ctx, command);
                        }
                    }
                });
            }

            ui.menu_button("View", |ui| {
                ui.checkbox(app.show_histogram_mut(), "Histogram");
            });
        });
    });
}
