#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

// When compiling natively:
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // An image given on the command line is opened at startup
    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([400.0, 300.0])
            .with_drag_and_drop(true)
            .with_title("Image Editor"),
        ..Default::default()
    };
    eframe::run_native(
        "eframe image editor",
        native_options,
        Box::new(move |cc| {
            let mut app = eframe_image_editor::ImageEditorApp::new(cc);
            if let Some(path) = initial_file {
                app.open_path(&cc.egui_ctx, path);
            }
            Ok(Box::new(app))
        }),
    )
}
