use image::{ColorType, DynamicImage};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// Static counter for generating unique IDs
static NEXT_IMAGE_ID: AtomicUsize = AtomicUsize::new(1);

/// Immutable bitmap shared between the history and the renderer.
///
/// Every edit produces a new `Image` with a fresh id, so the id alone is
/// enough to tell two versions apart (and to key cached textures).
#[derive(Clone)]
pub struct Image {
    id: usize,
    pixels: Arc<DynamicImage>,
}

impl Image {
    pub fn new(pixels: DynamicImage) -> Self {
        let id = NEXT_IMAGE_ID.fetch_add(1, Ordering::SeqCst);
        Self {
            id,
            pixels: Arc::new(pixels),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width() as usize, self.height() as usize]
    }

    pub fn color_type(&self) -> ColorType {
        self.pixels.color()
    }

    /// Compares pixel data, ignoring identity
    pub fn same_pixels(&self, other: &DynamicImage) -> bool {
        self.pixels.color() == other.color()
            && self.pixels.width() == other.width()
            && self.pixels.height() == other.height()
            && self.pixels.as_bytes() == other.as_bytes()
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("id", &self.id)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("color", &self.color_type())
            .finish()
    }
}

/// One entry of the edit timeline: an image and the action that produced it
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub image: Image,
    pub label: String,
}

impl Snapshot {
    pub fn new(image: Image, label: impl Into<String>) -> Self {
        Self {
            image,
            label: label.into(),
        }
    }
}
