//! Pixel operations behind the editor commands.
//!
//! Every transform takes the current image by reference and returns a new
//! one; nothing here touches the history or the UI.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_ellipse_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use imageproc::rect::Rect;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{EditorError, EditorResult};
use crate::settings::AlphaPolicy;
use crate::snapshot::Image;

const SHARPEN: [f32; 9] = [-2.0, -2.0, -2.0, -2.0, 32.0, -2.0, -2.0, -2.0, -2.0];
const FIND_EDGES: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];
const EMBOSS: [f32; 9] = [-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0];
const SMOOTH: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];

/// Rec. 601 luma, the weighting used for "L" conversions
pub(crate) fn luma([r, g, b]: [f32; 3]) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Formats the editor can write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Bmp,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Bmp];

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Bmp => "BMP",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Bmp => "bmp",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Jpeg => ImageFormat::Jpeg,
            ExportFormat::Bmp => ImageFormat::Bmp,
        }
    }

    /// Picks the format from a file extension, case-insensitively
    pub fn from_path(path: &Path) -> EditorResult<Self> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            "bmp" => Ok(ExportFormat::Bmp),
            "" => Err(EditorError::UnsupportedFormat("missing file extension".to_owned())),
            other => Err(EditorError::UnsupportedFormat(other.to_owned())),
        }
    }
}

/// Knobs for format-specific conversion on export
#[derive(Clone, Copy, Debug)]
pub struct ExportOptions {
    pub jpeg_quality: u8,
    pub alpha_policy: AlphaPolicy,
    pub background: [u8; 3],
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            alpha_policy: AlphaPolicy::Flatten,
            background: [255, 255, 255],
        }
    }
}

/// Extensions offered in the open dialog
pub const OPEN_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

/// Decode an image file
pub fn load(path: &Path) -> EditorResult<Image> {
    let pixels = image::open(path)?;
    log::info!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        pixels.width(),
        pixels.height(),
        pixels.color()
    );
    Ok(Image::new(pixels))
}

/// Converts an image into a pixel layout the target encoder accepts
pub fn prepare_for_export(
    image: &DynamicImage,
    format: ExportFormat,
    options: &ExportOptions,
) -> EditorResult<DynamicImage> {
    let color = image.color();
    let prepared = match format {
        ExportFormat::Png => match image {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                DynamicImage::ImageRgba16(image.to_rgba16())
            }
            _ => image.clone(),
        },
        ExportFormat::Jpeg => {
            if color.has_alpha() {
                match options.alpha_policy {
                    AlphaPolicy::Reject => {
                        return Err(EditorError::UnsupportedExportConversion {
                            format: format.label(),
                            color,
                        });
                    }
                    AlphaPolicy::Flatten => {
                        log::debug!("Flattening alpha onto {:?} for JPEG", options.background);
                        flatten_alpha(image, options.background)
                    }
                }
            } else if let DynamicImage::ImageLuma8(_) = image {
                image.clone()
            } else {
                DynamicImage::ImageRgb8(image.to_rgb8())
            }
        }
        ExportFormat::Bmp => match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_) => image.clone(),
            _ if color.has_alpha() => DynamicImage::ImageRgba8(image.to_rgba8()),
            _ => DynamicImage::ImageRgb8(image.to_rgb8()),
        },
    };
    Ok(prepared)
}

/// Encode `image` to `path` in the given format
pub fn save(
    image: &Image,
    path: &Path,
    format: ExportFormat,
    options: &ExportOptions,
) -> EditorResult<()> {
    let prepared = prepare_for_export(image.pixels(), format, options)?;
    match format {
        ExportFormat::Jpeg => {
            let writer = BufWriter::new(File::create(path)?);
            let encoder = JpegEncoder::new_with_quality(writer, options.jpeg_quality.clamp(1, 100));
            prepared.write_with_encoder(encoder)?;
        }
        _ => prepared.save_with_format(path, format.image_format())?,
    }
    log::info!("Saved {} as {}", path.display(), format.label());
    Ok(())
}

fn flatten_alpha(image: &DynamicImage, background: [u8; 3]) -> DynamicImage {
    let rgba = image.to_rgba8();
    let bg = background.map(f32::from);
    let rgb = image::RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = f32::from(a) / 255.0;
        let mix = |c: u8, bg: f32| (f32::from(c) * alpha + bg * (1.0 - alpha)).round() as u8;
        image::Rgb([mix(r, bg[0]), mix(g, bg[1]), mix(b, bg[2])])
    });
    DynamicImage::ImageRgb8(rgb)
}

/// Keep the alpha channel only if the source had one
fn match_alpha(rgba: RgbaImage, keep_alpha: bool) -> DynamicImage {
    let out = DynamicImage::ImageRgba8(rgba);
    if keep_alpha {
        out
    } else {
        DynamicImage::ImageRgb8(out.to_rgb8())
    }
}

fn map_rgb(image: &DynamicImage, f: impl Fn([f32; 3]) -> [f32; 3]) -> DynamicImage {
    let mut rgba = image.to_rgba8();
    for px in rgba.pixels_mut() {
        let [r, g, b, a] = px.0;
        let [r, g, b] = f([r, g, b].map(f32::from));
        let clamp = |c: f32| c.round().clamp(0.0, 255.0) as u8;
        *px = Rgba([clamp(r), clamp(g), clamp(b), a]);
    }
    match_alpha(rgba, image.color().has_alpha())
}

/// Convolve color channels with a 3x3 kernel, leaving alpha untouched
fn filter_color(image: &DynamicImage, kernel: &[f32; 9]) -> DynamicImage {
    let filtered = DynamicImage::ImageRgb8(image.to_rgb8()).filter3x3(kernel);
    if !image.color().has_alpha() {
        return filtered;
    }
    let mut rgba = image.to_rgba8();
    let rgb = filtered.to_rgb8();
    for (px, src) in rgba.pixels_mut().zip(rgb.pixels()) {
        px.0[..3].copy_from_slice(&src.0);
    }
    DynamicImage::ImageRgba8(rgba)
}

pub fn grayscale(image: &DynamicImage) -> DynamicImage {
    image.grayscale()
}

pub fn invert(image: &DynamicImage) -> DynamicImage {
    let mut out = image.clone();
    out.invert();
    out
}

pub fn flip_horizontal(image: &DynamicImage) -> DynamicImage {
    image.fliph()
}

pub fn flip_vertical(image: &DynamicImage) -> DynamicImage {
    image.flipv()
}

pub fn rotate90(image: &DynamicImage) -> DynamicImage {
    image.rotate90()
}

pub fn rotate180(image: &DynamicImage) -> DynamicImage {
    image.rotate180()
}

pub fn rotate270(image: &DynamicImage) -> DynamicImage {
    image.rotate270()
}

/// Rotate clockwise by an arbitrary angle around the center.
/// The canvas keeps its size; uncovered corners are transparent.
pub fn rotate_by(image: &DynamicImage, degrees: f32) -> DynamicImage {
    let rotated = rotate_about_center(
        &image.to_rgba8(),
        degrees.to_radians(),
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
    );
    DynamicImage::ImageRgba8(rotated)
}

pub fn resize(image: &DynamicImage, width: u32, height: u32) -> EditorResult<DynamicImage> {
    if width == 0 || height == 0 {
        return Err(EditorError::InvalidParameter(format!(
            "size must be positive, got {width}x{height}"
        )));
    }
    if (width, height) == (image.width(), image.height()) {
        return Ok(image.clone());
    }
    Ok(image.resize_exact(width, height, FilterType::Lanczos3))
}

/// Resize by a percentage of the current size, keeping at least one pixel
pub fn scale(image: &DynamicImage, percent: f32) -> EditorResult<DynamicImage> {
    if !(percent.is_finite() && percent > 0.0) {
        return Err(EditorError::InvalidParameter(format!(
            "scale must be positive, got {percent}%"
        )));
    }
    let factor = percent / 100.0;
    let width = ((image.width() as f32 * factor).round() as u32).max(1);
    let height = ((image.height() as f32 * factor).round() as u32).max(1);
    resize(image, width, height)
}

pub fn crop(image: &DynamicImage, x: u32, y: u32, width: u32, height: u32) -> EditorResult<DynamicImage> {
    let fits = |start: u32, len: u32, max: u32| start.checked_add(len).is_some_and(|end| end <= max);
    if width == 0 || height == 0 || !fits(x, width, image.width()) || !fits(y, height, image.height()) {
        return Err(EditorError::InvalidParameter(format!(
            "crop {width}x{height}+{x}+{y} is outside the {}x{} image",
            image.width(),
            image.height()
        )));
    }
    Ok(image.crop_imm(x, y, width, height))
}

pub fn blur(image: &DynamicImage, sigma: f32) -> DynamicImage {
    image.blur(sigma)
}

pub fn sharpen(image: &DynamicImage) -> DynamicImage {
    filter_color(image, &SHARPEN)
}

pub fn find_edges(image: &DynamicImage) -> DynamicImage {
    filter_color(image, &FIND_EDGES)
}

pub fn emboss(image: &DynamicImage) -> DynamicImage {
    filter_color(image, &EMBOSS)
}

pub fn smooth(image: &DynamicImage) -> DynamicImage {
    filter_color(image, &SMOOTH)
}

/// Scale toward black (`factor < 1`) or brighter (`factor > 1`)
pub fn brightness(image: &DynamicImage, factor: f32) -> DynamicImage {
    map_rgb(image, |rgb| rgb.map(|c| c * factor))
}

/// Scale the distance of every channel from the mean luma of the image
pub fn contrast(image: &DynamicImage, factor: f32) -> DynamicImage {
    let rgb = image.to_rgb8();
    let count = (rgb.width() as f64 * rgb.height() as f64).max(1.0);
    let total: f64 = rgb
        .pixels()
        .map(|px| f64::from(luma(px.0.map(f32::from))))
        .sum();
    let mean = (total / count) as f32;
    map_rgb(image, |rgb| rgb.map(|c| mean + factor * (c - mean)))
}

/// Scale the distance of every channel from the pixel's own gray value
pub fn saturation(image: &DynamicImage, factor: f32) -> DynamicImage {
    map_rgb(image, |rgb| {
        let gray = luma(rgb);
        rgb.map(|c| gray + factor * (c - gray))
    })
}

pub fn gamma(image: &DynamicImage, gamma: f32) -> EditorResult<DynamicImage> {
    if !(gamma.is_finite() && gamma > 0.0) {
        return Err(EditorError::InvalidParameter(format!("gamma must be positive, got {gamma}")));
    }
    let lut: Vec<f32> = (0..=255u16)
        .map(|v| 255.0 * (f32::from(v) / 255.0).powf(1.0 / gamma))
        .collect();
    Ok(map_rgb(image, |rgb| rgb.map(|c| lut[c as usize])))
}

/// Surround the image with a solid frame `width` pixels thick
pub fn border(image: &DynamicImage, width: u32, color: Rgba<u8>) -> EditorResult<DynamicImage> {
    if width == 0 {
        return Err(EditorError::InvalidParameter("border width must be positive".to_owned()));
    }
    let overflow = || EditorError::InvalidParameter(format!("border of {width}px is too large"));
    let total = width.checked_mul(2).ok_or_else(overflow)?;
    let new_width = image.width().checked_add(total).ok_or_else(overflow)?;
    let new_height = image.height().checked_add(total).ok_or_else(overflow)?;

    let mut canvas = RgbaImage::from_pixel(new_width, new_height, color);
    imageops::overlay(&mut canvas, &image.to_rgba8(), i64::from(width), i64::from(width));
    Ok(match_alpha(canvas, image.color().has_alpha() || color.0[3] < 255))
}

/// Largest radius accepted by the ellipse drawing routine
const MAX_ELLIPSE_RADIUS: i32 = 1 << 15;

/// Rejects drawing coordinates more than one canvas size outside the image
fn check_drawable(image: &DynamicImage, what: &str, points: &[(i64, i64)]) -> EditorResult<()> {
    let (width, height) = (i64::from(image.width()), i64::from(image.height()));
    let near = |value: i64, size: i64| (-size..=2 * size).contains(&value);
    if points.iter().all(|&(x, y)| near(x, width) && near(y, height)) {
        Ok(())
    } else {
        Err(EditorError::InvalidParameter(format!(
            "{what} lies too far outside the {width}x{height} image"
        )))
    }
}

pub fn draw_rectangle(
    image: &DynamicImage,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: Rgba<u8>,
) -> EditorResult<DynamicImage> {
    if width == 0 || height == 0 {
        return Err(EditorError::InvalidParameter("rectangle must have a positive size".to_owned()));
    }
    let (x, y) = (i64::from(x), i64::from(y));
    check_drawable(image, "rectangle", &[(x, y), (x + i64::from(width), y + i64::from(height))])?;

    let mut rgba = image.to_rgba8();
    // Bounded by the canvas check above
    let rect = Rect::at(x as i32, y as i32).of_size(width, height);
    draw_hollow_rect_mut(&mut rgba, rect, color);
    Ok(match_alpha(rgba, image.color().has_alpha()))
}

pub fn draw_ellipse(
    image: &DynamicImage,
    center: (i32, i32),
    radius_x: i32,
    radius_y: i32,
    color: Rgba<u8>,
) -> EditorResult<DynamicImage> {
    if radius_x <= 0 || radius_y <= 0 {
        return Err(EditorError::InvalidParameter("ellipse radii must be positive".to_owned()));
    }
    if radius_x > MAX_ELLIPSE_RADIUS || radius_y > MAX_ELLIPSE_RADIUS {
        return Err(EditorError::InvalidParameter(format!(
            "ellipse radii must be at most {MAX_ELLIPSE_RADIUS}"
        )));
    }
    let (cx, cy) = (i64::from(center.0), i64::from(center.1));
    let (rx, ry) = (i64::from(radius_x), i64::from(radius_y));
    check_drawable(image, "ellipse", &[(cx - rx, cy - ry), (cx + rx, cy + ry)])?;

    let mut rgba = image.to_rgba8();
    draw_hollow_ellipse_mut(&mut rgba, center, radius_x, radius_y, color);
    Ok(match_alpha(rgba, image.color().has_alpha()))
}

pub fn draw_line(
    image: &DynamicImage,
    start: (i32, i32),
    end: (i32, i32),
    color: Rgba<u8>,
) -> EditorResult<DynamicImage> {
    let point = |(x, y): (i32, i32)| (i64::from(x), i64::from(y));
    check_drawable(image, "line", &[point(start), point(end)])?;

    let mut rgba = image.to_rgba8();
    draw_line_segment_mut(
        &mut rgba,
        (start.0 as f32, start.1 as f32),
        (end.0 as f32, end.1 as f32),
        color,
    );
    Ok(match_alpha(rgba, image.color().has_alpha()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn checker(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 { Rgb([200, 40, 40]) } else { Rgb([20, 20, 220]) }
        }))
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("a.PNG")).unwrap(), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("a.jpeg")).unwrap(), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_path(Path::new("a.bmp")).unwrap(), ExportFormat::Bmp);
        assert!(matches!(
            ExportFormat::from_path(Path::new("a.xcf")),
            Err(EditorError::UnsupportedFormat(ext)) if ext == "xcf"
        ));
        assert!(ExportFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_filters_keep_alpha() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 77])));
        let edges = find_edges(&rgba).to_rgba8();
        assert!(edges.pixels().all(|px| px.0[3] == 77));
    }

    #[test]
    fn test_brightness_factor_one_is_identity() {
        let image = checker(5, 3);
        assert_eq!(brightness(&image, 1.0).as_bytes(), image.as_bytes());
    }

    #[test]
    fn test_saturation_zero_is_gray() {
        let out = saturation(&checker(3, 3), 0.0).to_rgb8();
        assert!(out.pixels().all(|px| px.0[0] == px.0[1] && px.0[1] == px.0[2]));
    }

    #[test]
    fn test_gamma_keeps_extremes() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        }));
        let out = gamma(&image, 2.2).unwrap().to_rgb8();
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [255, 255, 255]);
        assert!(gamma(&image, 0.0).is_err());
    }

    #[test]
    fn test_scale_never_reaches_zero() {
        let out = scale(&checker(10, 4), 1.0).unwrap();
        assert_eq!((out.width(), out.height()), (1, 1));
    }

    #[test]
    fn test_drawing_far_outside_the_canvas_is_rejected() {
        let image = checker(20, 20);
        let red = Rgba([255, 0, 0, 255]);
        assert!(draw_rectangle(&image, 2_147_483_000, 0, 1000, 10, red).is_err());
        assert!(draw_rectangle(&image, i32::MIN, 0, 5, 5, red).is_err());
        assert!(draw_ellipse(&image, (2_147_483_000, 0), 1000, 10, red).is_err());
        assert!(draw_ellipse(&image, (10, 10), i32::MAX, 5, red).is_err());
        assert!(draw_line(&image, (i32::MIN, 0), (i32::MAX, 5), red).is_err());
    }

    #[test]
    fn test_drawing_may_overhang_the_canvas() {
        let image = checker(20, 20);
        let red = Rgba([255, 0, 0, 255]);
        let out = draw_rectangle(&image, -10, -10, 50, 50, red).unwrap();
        assert_eq!((out.width(), out.height()), (20, 20));
        assert!(draw_ellipse(&image, (10, 10), 25, 25, red).is_ok());
        let line = draw_line(&image, (-20, 0), (19, 0), red).unwrap().to_rgba8();
        assert_eq!(line.get_pixel(5, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_crop_overflow_is_rejected() {
        let image = checker(10, 10);
        assert!(crop(&image, u32::MAX, 0, 2, 2).is_err());
        assert!(crop(&image, 0, 0, 0, 2).is_err());
    }
}
