use eframe::egui;

use crate::ImageEditorApp;

pub fn central_panel(app: &mut ImageEditorApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let canvas_rect = ui.available_rect_before_wrap();
            let painter = ui.painter_at(canvas_rect);

            let image = app.document().current_image().cloned();
            app.renderer_mut().render(ctx, &painter, canvas_rect, image.as_ref());
        });
}
