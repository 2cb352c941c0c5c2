use eframe::egui;

use crate::ImageEditorApp;

pub fn history_panel(app: &mut ImageEditorApp, ctx: &egui::Context) {
    egui::SidePanel::right("history_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("History");

            // Undo/Redo section
            ui.horizontal(|ui| {
                let can_undo = app.document().history().can_undo();
                let can_redo = app.document().history().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo(ctx);
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo(ctx);
                }
            });

            ui.separator();

            let history = app.document().history();
            ui.label(format!("Snapshots: {}", history.len()));

            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::Grid::new("edit_history_grid")
                    .num_columns(2)
                    .spacing([12.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        let cursor = history.cursor();
                        for (index, snapshot) in history.iter().enumerate() {
                            let label = format!("{}. {}", index + 1, snapshot.label);
                            match cursor {
                                // Snapshots past the cursor can still be redone
                                Some(cursor) if index > cursor => ui.weak(label),
                                Some(cursor) if index == cursor => ui.strong(label),
                                _ => ui.label(label),
                            };
                            let [width, height] = snapshot.image.size();
                            ui.weak(format!("{width}x{height}"));
                            ui.end_row();
                        }
                    });
            });
        });
}
