use std::path::{Path, PathBuf};

use crate::command::{EditHistory, HistoryError};
use crate::snapshot::{Image, Snapshot};

/// The open image and its edit timeline.
///
/// The history owns every snapshot; the document only hands out borrows of
/// the current one.
#[derive(Debug, Default)]
pub struct Document {
    history: EditHistory<Snapshot>,
    path: Option<PathBuf>,
    /// Id of the image last loaded or saved
    saved_image: Option<usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new timeline from a freshly loaded image
    pub fn open(&mut self, image: Image, path: Option<PathBuf>) {
        self.history.reset(Snapshot::new(image, "Open"));
        self.path = path;
        self.saved_image = self.current_image().map(Image::id);
    }

    pub fn is_loaded(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn current(&self) -> Result<&Snapshot, HistoryError> {
        self.history.current()
    }

    pub fn current_image(&self) -> Option<&Image> {
        self.history.current().ok().map(|snapshot| &snapshot.image)
    }

    pub fn commit(&mut self, image: Image, label: impl Into<String>) {
        self.history.commit(Snapshot::new(image, label));
    }

    pub fn undo(&mut self) -> Result<&Snapshot, HistoryError> {
        self.history.undo()
    }

    pub fn redo(&mut self) -> Result<&Snapshot, HistoryError> {
        self.history.redo()
    }

    pub fn history(&self) -> &EditHistory<Snapshot> {
        &self.history
    }

    pub fn set_history_limit(&mut self, max_snapshots: Option<usize>) {
        if self.history.capacity_limit() != max_snapshots {
            self.history.set_capacity_limit(max_snapshots);
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Records that the current snapshot was written to `path`
    pub fn mark_saved(&mut self, path: PathBuf) {
        self.path = Some(path);
        self.saved_image = self.current_image().map(Image::id);
    }

    /// True if the current snapshot differs from the one last loaded or saved
    pub fn is_dirty(&self) -> bool {
        self.is_loaded() && self.saved_image != self.current_image().map(Image::id)
    }
}
