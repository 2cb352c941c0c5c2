#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod document;
pub mod error;
pub mod file_handler;
pub mod histogram;
pub mod panels;
pub mod presenter;
pub mod prompt;
pub mod renderer;
pub mod settings;
pub mod snapshot;
pub mod texture_manager;
pub mod transform;

pub use app::ImageEditorApp;
pub use command::{Dispatcher, EditHistory};
pub use document::Document;
pub use error::{EditorError, EditorResult};
pub use presenter::{NativePresenter, Presenter};
pub use renderer::Renderer;
pub use settings::EditorSettings;
pub use snapshot::{Image, Snapshot};
