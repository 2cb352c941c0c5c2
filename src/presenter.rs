use eframe::egui;
use std::path::PathBuf;

use crate::command::Param;
use crate::renderer::Renderer;
use crate::snapshot::Image;
use crate::transform::OPEN_EXTENSIONS;

/// The surface the editor core talks to: dialogs, prompts and the preview.
///
/// Every method returning an `Option` yields `None` when the user cancels.
pub trait Presenter {
    /// Ask for an image file to open
    fn open_file_dialog(&mut self) -> Option<PathBuf>;

    /// Ask for a destination, suggesting `default_ext` (without the dot)
    fn save_file_dialog(&mut self, default_ext: &str) -> Option<PathBuf>;

    /// Ask for a line of text
    fn prompt_string(&mut self, title: &str) -> Option<String>;

    /// Ask for a number in `min..=max`
    fn prompt_float(&mut self, title: &str, min: f32, max: f32) -> Option<f32>;

    /// Show `image` as the current picture
    fn render(&mut self, image: &Image);
}

/// Presenter backed by native file dialogs and the egui preview.
///
/// egui cannot block inside a frame, so parameter prompts are collected by a
/// modal window first and handed over as `answer`; the dispatcher then reads
/// it through `prompt_float`/`prompt_string` as if the user had just typed it.
pub struct NativePresenter<'a> {
    ctx: &'a egui::Context,
    renderer: &'a mut Renderer,
    answer: Option<Param>,
}

impl<'a> NativePresenter<'a> {
    pub fn new(ctx: &'a egui::Context, renderer: &'a mut Renderer) -> Self {
        Self {
            ctx,
            renderer,
            answer: None,
        }
    }

    /// Presenter whose next prompt is answered with `answer`
    pub fn with_answer(ctx: &'a egui::Context, renderer: &'a mut Renderer, answer: Param) -> Self {
        Self {
            answer: Some(answer),
            ..Self::new(ctx, renderer)
        }
    }
}

impl Presenter for NativePresenter<'_> {
    fn open_file_dialog(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Open Image")
            .add_filter("Images", &OPEN_EXTENSIONS)
            .pick_file()
    }

    fn save_file_dialog(&mut self, default_ext: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Save Image")
            .add_filter(default_ext.to_uppercase(), &[default_ext])
            .set_file_name(format!("untitled.{default_ext}"))
            .save_file()
    }

    fn prompt_string(&mut self, title: &str) -> Option<String> {
        match self.answer.take() {
            Some(Param::Text(text)) => Some(text),
            other => {
                log::warn!("{title}: no text answer available ({other:?})");
                None
            }
        }
    }

    fn prompt_float(&mut self, title: &str, _min: f32, _max: f32) -> Option<f32> {
        match self.answer.take() {
            Some(Param::Float(value)) => Some(value),
            other => {
                log::warn!("{title}: no numeric answer available ({other:?})");
                None
            }
        }
    }

    fn render(&mut self, image: &Image) {
        self.renderer.prepare(self.ctx, image);
    }
}
