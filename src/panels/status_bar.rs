use eframe::egui;

use crate::ImageEditorApp;

pub fn status_bar(app: &mut ImageEditorApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let document = app.document();
            match document.current_image() {
                Some(image) => {
                    let name = document
                        .path()
                        .and_then(|path| path.file_name())
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "Untitled".to_owned());
                    let dirty = if document.is_dirty() { " *" } else { "" };
                    ui.label(format!("{name}{dirty}"));
                    ui.separator();
                    ui.label(format!("{} x {}", image.width(), image.height()));
                    ui.separator();
                    ui.label(format!("{:?}", image.color_type()));
                }
                None => {
                    ui.label("No image");
                }
            }

            if let Some(status) = app.status() {
                ui.separator();
                if status.is_error {
                    ui.colored_label(ui.visuals().error_fg_color, &status.text);
                } else {
                    ui.label(&status.text);
                }
            }
        });
    });
}
