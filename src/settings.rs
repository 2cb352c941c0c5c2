use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::EditorResult;

/// Whether an edit that leaves the pixels untouched still creates a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CommitPolicy {
    /// Every successful command commits, even if nothing changed
    #[default]
    Always,
    /// Commands whose output equals their input are skipped
    SkipUnchanged,
}

/// What to do with transparency when exporting to a format without alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlphaPolicy {
    /// Composite onto the background color
    #[default]
    Flatten,
    /// Refuse to export
    Reject,
}

/// User-facing editor configuration, persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // new fields get their default when reading older state
pub struct EditorSettings {
    pub commit_policy: CommitPolicy,
    /// Upper bound on stored snapshots; `None` keeps everything
    pub max_history: Option<usize>,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    pub alpha_policy: AlphaPolicy,
    /// Background used when flattening alpha, unmultiplied RGB
    pub background: [u8; 3],
    /// Color for drawing primitives and borders, unmultiplied RGBA
    pub draw_color: [u8; 4],
    /// Allow the preview to scale images above 100%
    pub upscale_preview: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            commit_policy: CommitPolicy::Always,
            max_history: None,
            jpeg_quality: 90,
            alpha_policy: AlphaPolicy::Flatten,
            background: [255, 255, 255],
            draw_color: [255, 0, 0, 255],
            upscale_preview: false,
        }
    }
}

impl EditorSettings {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse settings, filling missing fields with defaults
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.jpeg_quality = settings.jpeg_quality.clamp(1, 100);
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> EditorResult<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings written to {}", path.display());
        Ok(())
    }

    pub fn load_from(path: &Path) -> EditorResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Settings loaded from {}", path.display());
        Ok(settings)
    }
}
