use eframe::egui;
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::presenter::Presenter;
use crate::snapshot::Image;
use crate::transform::{self, ExportFormat, ExportOptions, OPEN_EXTENSIONS};

/// Loads and saves the document through the presenter's dialogs, and picks up
/// image files dropped onto the window.
#[derive(Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a file and open it. Returns false if the dialog was cancelled.
    pub fn open(document: &mut Document, presenter: &mut dyn Presenter) -> EditorResult<bool> {
        let Some(path) = presenter.open_file_dialog() else {
            log::debug!("Open cancelled");
            return Ok(false);
        };
        Self::open_path(document, path, presenter)?;
        Ok(true)
    }

    /// Load `path` as a new document, replacing the current history
    pub fn open_path(document: &mut Document, path: PathBuf, presenter: &mut dyn Presenter) -> EditorResult<()> {
        let image = transform::load(&path)?;
        Self::open_image(document, image, Some(path), presenter);
        Ok(())
    }

    fn open_image(document: &mut Document, image: Image, path: Option<PathBuf>, presenter: &mut dyn Presenter) {
        document.open(image, path);
        if let Some(image) = document.current_image() {
            presenter.render(image);
        }
    }

    /// Ask for a destination and write the current snapshot there.
    ///
    /// With `format` unset the format follows the chosen extension, defaulting
    /// to PNG. Returns the written path, or `None` if nothing was saved
    /// because no image is open or the dialog was cancelled.
    pub fn save(
        document: &mut Document,
        presenter: &mut dyn Presenter,
        format: Option<ExportFormat>,
        options: &ExportOptions,
    ) -> EditorResult<Option<PathBuf>> {
        let Some(image) = document.current_image().cloned() else {
            log::debug!("Save ignored: {}", EditorError::NoImageLoaded);
            return Ok(None);
        };

        let default_ext = format.unwrap_or(ExportFormat::Png).extension();
        let Some(path) = presenter.save_file_dialog(default_ext) else {
            log::debug!("Save cancelled");
            return Ok(None);
        };
        let (path, format) = match format {
            Some(format) => (with_format_extension(path, format), format),
            None => {
                let path = with_default_extension(path, default_ext);
                let format = ExportFormat::from_path(&path)?;
                (path, format)
            }
        };

        transform::save(&image, &path, format, options)?;
        document.mark_saved(path.clone());
        Ok(Some(path))
    }

    /// Process any newly dropped files from the UI context
    /// Returns true if any new files were collected
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                true
            } else {
                false
            }
        })
    }

    /// Opens the first dropped image file. Other dropped files are ignored.
    pub fn process_dropped_files(
        &mut self,
        document: &mut Document,
        presenter: &mut dyn Presenter,
    ) -> EditorResult<bool> {
        let dropped = std::mem::take(&mut self.dropped_files);
        let Some(file) = dropped.iter().find(|file| is_image_file(file)) else {
            if let Some(file) = dropped.first() {
                log::warn!("Dropped file is not a supported type: {}", display_name(file));
            }
            return Ok(false);
        };
        if dropped.len() > 1 {
            log::info!("{} files dropped, opening {}", dropped.len(), display_name(file));
        }

        if let Some(bytes) = &file.bytes {
            log::info!("Processing image from memory: {} ({} bytes)", display_name(file), bytes.len());
            let image = Image::new(image::load_from_memory(bytes)?);
            Self::open_image(document, image, file.path.clone(), presenter);
        } else if let Some(path) = &file.path {
            log::info!("Processing image from path: {}", path.display());
            Self::open_path(document, path.clone(), presenter)?;
        } else {
            log::warn!("Dropped file has no accessible data: {}", display_name(file));
            return Ok(false);
        }
        Ok(true)
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop to open:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                } else {
                    text += "\n(Path not available)";
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = file
        .path
        .as_deref()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&file.name));
    has_image_extension(&name)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| OPEN_EXTENSIONS.contains(&ext.as_str()))
}

/// Appends `ext` if the user typed a name without an extension
pub fn with_default_extension(mut path: PathBuf, ext: &str) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension(ext);
    }
    path
}

/// Makes the extension of `path` name `format`: a different known image
/// extension is replaced, anything else gets the format's extension appended
pub fn with_format_extension(path: PathBuf, format: ExportFormat) -> PathBuf {
    match ExportFormat::from_path(&path) {
        Ok(existing) if existing == format => path,
        Ok(_) => path.with_extension(format.extension()),
        Err(_) => {
            let mut name = path.into_os_string();
            name.push(".");
            name.push(format.extension());
            PathBuf::from(name)
        }
    }
}
