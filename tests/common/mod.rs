#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;

use eframe_image_editor::{Image, Presenter};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

/// Presenter that answers dialogs from scripted queues and records redraws.
/// An exhausted queue behaves like a cancelled dialog.
#[derive(Default)]
pub struct MockPresenter {
    pub open_paths: VecDeque<PathBuf>,
    pub save_paths: VecDeque<PathBuf>,
    pub strings: VecDeque<String>,
    pub floats: VecDeque<f32>,
    /// Titles of every prompt shown, in order
    pub prompts: Vec<String>,
    /// Ids of every rendered image, in order
    pub rendered: Vec<usize>,
}

impl MockPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering_text(text: &str) -> Self {
        let mut presenter = Self::new();
        presenter.strings.push_back(text.to_owned());
        presenter
    }

    pub fn answering_float(value: f32) -> Self {
        let mut presenter = Self::new();
        presenter.floats.push_back(value);
        presenter
    }
}

impl Presenter for MockPresenter {
    fn open_file_dialog(&mut self) -> Option<PathBuf> {
        self.open_paths.pop_front()
    }

    fn save_file_dialog(&mut self, _default_ext: &str) -> Option<PathBuf> {
        self.save_paths.pop_front()
    }

    fn prompt_string(&mut self, title: &str) -> Option<String> {
        self.prompts.push(title.to_owned());
        self.strings.pop_front()
    }

    fn prompt_float(&mut self, title: &str, _min: f32, _max: f32) -> Option<f32> {
        self.prompts.push(title.to_owned());
        self.floats.pop_front()
    }

    fn render(&mut self, image: &Image) {
        self.rendered.push(image.id());
    }
}

/// Opaque RGB test image with a horizontal gradient
pub fn gradient(width: u32, height: u32) -> Image {
    let pixels = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    });
    Image::new(DynamicImage::ImageRgb8(pixels))
}

/// RGBA test image whose left half is fully transparent
pub fn half_transparent(width: u32, height: u32) -> Image {
    let pixels = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 { Rgba([0, 0, 0, 0]) } else { Rgba([0, 0, 255, 255]) }
    });
    Image::new(DynamicImage::ImageRgba8(pixels))
}

/// Unique scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("eframe_image_editor_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
