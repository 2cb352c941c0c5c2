use image::ColorType;
use thiserror::Error;

use crate::command::HistoryError;

/// Errors that can occur while editing, loading or saving an image
#[derive(Debug, Error)]
pub enum EditorError {
    /// An edit was attempted with nothing open
    #[error("No image is loaded")]
    NoImageLoaded,

    /// The user aborted a file or parameter prompt
    #[error("Dialog was cancelled")]
    DialogCancelled,

    /// The target format cannot hold the image and conversion is disabled
    #[error("Cannot export a {color:?} image as {format} without converting it")]
    UnsupportedExportConversion {
        format: &'static str,
        color: ColorType,
    },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
