use image::DynamicImage;

use crate::transform;

/// Per-channel intensity counts of an 8-bit RGB view of an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    pub red: [u32; 256],
    pub green: [u32; 256],
    pub blue: [u32; 256],
    pub luma: [u32; 256],
}

impl Histogram {
    pub fn from_image(image: &DynamicImage) -> Self {
        let mut histogram = Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
            luma: [0; 256],
        };
        for px in image.to_rgb8().pixels() {
            let [r, g, b] = px.0;
            histogram.red[r as usize] += 1;
            histogram.green[g as usize] += 1;
            histogram.blue[b as usize] += 1;
            let luma = transform::luma([r, g, b].map(f32::from));
            histogram.luma[luma.round().clamp(0.0, 255.0) as usize] += 1;
        }
        histogram
    }

    /// Largest single bin over all channels, for normalizing plots
    pub fn peak(&self) -> u32 {
        [&self.red, &self.green, &self.blue, &self.luma]
            .iter()
            .flat_map(|channel| channel.iter().copied())
            .max()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.luma.iter().map(|&count| u64::from(count)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_counts_every_pixel_once() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(4, 3, |x, _| {
            if x < 2 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 0]) }
        }));
        let histogram = Histogram::from_image(&image);
        assert_eq!(histogram.total(), 12);
        assert_eq!(histogram.red[255], 6);
        assert_eq!(histogram.red[0], 6);
        assert_eq!(histogram.blue[0], 12);
        assert_eq!(histogram.peak(), 12);
    }

    #[test]
    fn test_luma_bins_match_gray_conversion() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([200, 100, 50])));
        let histogram = Histogram::from_image(&image);
        let expected = transform::luma([200.0, 100.0, 50.0]).round() as usize;
        assert_eq!(expected, 124);
        assert_eq!(histogram.luma[expected], 4);
    }
}
