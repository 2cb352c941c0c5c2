use std::collections::{HashMap, HashSet};
use egui::{Context, TextureHandle, ColorImage, TextureOptions};
use thiserror::Error;

use crate::snapshot::Image;

/// Errors that can occur during texture generation
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Invalid texture dimensions {0}x{1}")]
    InvalidDimensions(usize, usize),
    #[error("Image of {0}x{1} exceeds the maximum texture side of {2}")]
    TooLarge(usize, usize, usize),
}

/// Uploads snapshots to the GPU, caching textures by image id.
///
/// Snapshots never change once created, so a cached texture stays valid for
/// as long as its image exists; undo/redo just picks an older entry.
pub struct TextureManager {
    /// Cache of textures by image id
    texture_cache: HashMap<usize, TextureHandle>,
    /// Tracks when each texture was last used
    last_used: HashMap<usize, u64>,
    /// Current frame counter for LRU tracking
    current_frame: u64,
    /// Maximum number of textures to cache
    max_cache_size: usize,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.texture_cache.len())
            .field("max_cache_size", &self.max_cache_size)
            .finish()
    }
}

impl TextureManager {
    /// Creates a new texture manager with the specified cache size
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Gets or uploads the texture for `image`
    pub fn get_or_create_texture(
        &mut self,
        image: &Image,
        ctx: &Context,
    ) -> Result<TextureHandle, TextureGenerationError> {
        let key = image.id();

        // Check if the texture is already in the cache
        if let Some(handle) = self.texture_cache.get(&key) {
            self.last_used.insert(key, self.current_frame);
            return Ok(handle.clone());
        }

        let color_image = to_color_image(image, ctx.input(|i| i.max_texture_side))?;

        // Make room for the new texture
        self.prune_cache(self.max_cache_size - 1);

        let name = format!("snapshot_{}", key);
        let handle = ctx.load_texture(name, color_image, TextureOptions::LINEAR);
        log::debug!("Uploaded texture for image {} ({}x{})", key, image.width(), image.height());

        self.texture_cache.insert(key, handle.clone());
        self.last_used.insert(key, self.current_frame);

        Ok(handle)
    }

    /// Drops the texture for a specific image
    pub fn invalidate(&mut self, image_id: usize) {
        self.texture_cache.remove(&image_id);
        self.last_used.remove(&image_id);
    }

    /// Drops every texture whose image is not in `live`
    pub fn retain_images(&mut self, live: &HashSet<usize>) {
        let stale: Vec<usize> = self
            .texture_cache
            .keys()
            .copied()
            .filter(|id| !live.contains(id))
            .collect();
        for id in stale {
            self.invalidate(id);
        }
    }

    /// Evicts least recently used textures until at most `keep` remain
    fn prune_cache(&mut self, keep: usize) {
        if self.texture_cache.len() <= keep {
            return;
        }

        // Sort by last-used frame (oldest first)
        let mut entries: Vec<(usize, u64)> = self.last_used
            .iter()
            .map(|(k, v)| (*k, *v))
            .collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() - keep;
        for (id, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(id);
            self.last_used.remove(id);
        }
    }

    /// Returns the number of textures currently in the cache
    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    pub fn contains(&self, image_id: usize) -> bool {
        self.texture_cache.contains_key(&image_id)
    }
}

/// Converts a snapshot into an egui image, rejecting sizes the GPU cannot hold
pub fn to_color_image(image: &Image, max_side: usize) -> Result<ColorImage, TextureGenerationError> {
    let [width, height] = image.size();
    if width == 0 || height == 0 {
        return Err(TextureGenerationError::InvalidDimensions(width, height));
    }
    if width > max_side || height > max_side {
        return Err(TextureGenerationError::TooLarge(width, height, max_side));
    }
    let rgba = image.pixels().to_rgba8();
    Ok(ColorImage::from_rgba_unmultiplied([width, height], rgba.as_raw()))
}
