// src/renderer.rs
use eframe::egui::{self, Color32, Rect, Stroke, Vec2};

use crate::document::Document;
use crate::snapshot::Image;
use crate::texture_manager::TextureManager;

/// Draws the current snapshot into the canvas area
#[derive(Debug)]
pub struct Renderer {
    textures: TextureManager,
    /// Allow scaling small images above their natural size
    allow_upscale: bool,
    /// Set when the last upload failed, so the error is logged once
    last_error: Option<String>,
}

impl Renderer {
    /// Number of snapshot textures kept alive for quick undo/redo
    const TEXTURE_CACHE_SIZE: usize = 16;

    pub fn new() -> Self {
        Self {
            textures: TextureManager::new(Self::TEXTURE_CACHE_SIZE),
            allow_upscale: false,
            last_error: None,
        }
    }

    pub fn set_allow_upscale(&mut self, allow: bool) {
        self.allow_upscale = allow;
    }

    /// Should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.textures.begin_frame();
    }

    /// Uploads `image` ahead of the next paint
    pub fn prepare(&mut self, ctx: &egui::Context, image: &Image) {
        match self.textures.get_or_create_texture(image, ctx) {
            Ok(_) => self.last_error = None,
            Err(err) => self.report(err.to_string()),
        }
        ctx.request_repaint();
    }

    /// Releases textures of snapshots that left the history
    pub fn retain_history(&mut self, document: &Document) {
        let live = document.history().iter().map(|snapshot| snapshot.image.id()).collect();
        self.textures.retain_images(&live);
    }

    #[cfg(test)]
    pub(crate) fn has_texture(&self, image_id: usize) -> bool {
        self.textures.contains(image_id)
    }

    /// Renders `image` scaled to fit `rect`, or a placeholder if there is none
    pub fn render(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect, image: Option<&Image>) {
        painter.rect_filled(rect, 0.0, Color32::from_gray(40));

        let Some(image) = image else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "File → Open… or drop an image here",
                egui::FontId::proportional(18.0),
                Color32::GRAY,
            );
            return;
        };

        match self.textures.get_or_create_texture(image, ctx) {
            Ok(texture) => {
                let [width, height] = image.size();
                let target = fit_rect(Vec2::new(width as f32, height as f32), rect, self.allow_upscale);
                let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture.id(), target, uv, Color32::WHITE);
                painter.rect_stroke(target, 0.0, Stroke::new(1.0, Color32::from_gray(90)));
                self.last_error = None;
            }
            Err(err) => {
                let message = err.to_string();
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    &message,
                    egui::FontId::proportional(16.0),
                    Color32::LIGHT_RED,
                );
                self.report(message);
            }
        }
    }

    fn report(&mut self, message: String) {
        if self.last_error.as_deref() != Some(message.as_str()) {
            log::error!("Cannot display image: {}", message);
            self.last_error = Some(message);
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest rectangle with the image's aspect ratio that fits in `available`,
/// centered. Without `allow_upscale` the image is never drawn above 1:1.
pub fn fit_rect(image_size: Vec2, available: Rect, allow_upscale: bool) -> Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 || available.width() <= 0.0 || available.height() <= 0.0 {
        return Rect::from_center_size(available.center(), Vec2::ZERO);
    }
    let mut scale = (available.width() / image_size.x).min(available.height() / image_size.y);
    if !allow_upscale {
        scale = scale.min(1.0);
    }
    Rect::from_center_size(available.center(), image_size * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::DynamicImage;

    fn area(width: f32, height: f32) -> Rect {
        Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(width, height))
    }

    #[test]
    fn test_fit_preserves_aspect_ratio() {
        let fitted = fit_rect(egui::vec2(1200.0, 600.0), area(600.0, 400.0), false);
        assert_eq!(fitted.size(), egui::vec2(600.0, 300.0));
        assert_eq!(fitted.center(), egui::pos2(300.0, 200.0));
    }

    #[test]
    fn test_small_images_are_not_upscaled() {
        let fitted = fit_rect(egui::vec2(100.0, 50.0), area(600.0, 400.0), false);
        assert_eq!(fitted.size(), egui::vec2(100.0, 50.0));

        let upscaled = fit_rect(egui::vec2(100.0, 50.0), area(600.0, 400.0), true);
        assert_eq!(upscaled.size(), egui::vec2(600.0, 300.0));
    }

    #[test]
    fn test_render_basics() {
        let mut renderer = Renderer::new();
        let ctx = egui::Context::default();
        // Fonts are only available after the first pass.
        let _ = ctx.run(Default::default(), |_| {});
        let layer_id = egui::LayerId::background();
        let rect = area(100.0, 100.0);
        let painter = egui::Painter::new(ctx.clone(), layer_id, rect);
        let image = Image::new(DynamicImage::new_rgb8(20, 10));

        renderer.render(&ctx, &painter, rect, None);
        renderer.render(&ctx, &painter, rect, Some(&image));
        assert!(renderer.last_error.is_none());
    }
}
