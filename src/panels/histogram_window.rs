use eframe::egui::{self, Color32, Pos2, Sense, Stroke};

use crate::ImageEditorApp;
use crate::histogram::Histogram;

const BAR_WIDTH: f32 = 1.5;
const PLOT_HEIGHT: f32 = 120.0;

pub fn histogram_window(app: &mut ImageEditorApp, ctx: &egui::Context) {
    let mut open = *app.show_histogram_mut();
    if !open {
        return;
    }

    egui::Window::new("Histogram")
        .open(&mut open)
        .resizable(false)
        .default_pos(egui::pos2(40.0, 60.0))
        .show(ctx, |ui| match app.histogram() {
            Some(histogram) => plot(ui, histogram),
            None => {
                ui.label("No image loaded");
            }
        });

    *app.show_histogram_mut() = open;
}

fn plot(ui: &mut egui::Ui, histogram: &Histogram) {
    let size = egui::vec2(256.0 * BAR_WIDTH, PLOT_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, Color32::from_gray(20));

    let peak = histogram.peak().max(1) as f32;
    let channels = [
        (&histogram.red, Color32::from_rgba_unmultiplied(255, 60, 60, 140)),
        (&histogram.green, Color32::from_rgba_unmultiplied(60, 255, 60, 140)),
        (&histogram.blue, Color32::from_rgba_unmultiplied(60, 60, 255, 140)),
        (&histogram.luma, Color32::from_rgba_unmultiplied(230, 230, 230, 200)),
    ];
    for (bins, color) in channels {
        let points: Vec<Pos2> = bins
            .iter()
            .enumerate()
            .map(|(level, &count)| {
                let x = rect.left() + level as f32 * BAR_WIDTH;
                let y = rect.bottom() - count as f32 / peak * rect.height();
                egui::pos2(x, y)
            })
            .collect();
        painter.add(egui::Shape::line(points, Stroke::new(1.0, color)));
    }

    response.on_hover_text(format!("{} pixels", histogram.total()));
}
