//! Loading and saving images, and the path based entry points.

use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgb32FImage};
use rand::Rng;
use tracing::debug;

use crate::config::WatermarkConfig;
use crate::error::Result;
use crate::watermark::Watermark;

/// Load an image from disk as float RGB, samples in `[0, 1]`.
pub fn load(path: &Path) -> Result<Rgb32FImage> {
    let image = image::open(path)?;
    debug!(path = %path.display(), color = ?image.color(), "Loaded image");
    Ok(image.into_rgb32f())
}

/// Save an image, quantized to 16 bits per sample for formats that support it, 8 bits otherwise.
///
/// The watermark only survives quantization if the perturbation exceeds the quantization step,
/// 16 bit output keeps small alpha values detectable.
pub fn save(path: &Path, image: &Rgb32FImage) -> Result<()> {
    let format = ImageFormat::from_path(path)?;
    let image = DynamicImage::ImageRgb32F(image.clone());
    match format {
        ImageFormat::Png | ImageFormat::Tiff => image.into_rgb16().save_with_format(path, format)?,
        _ => image.into_rgb8().save_with_format(path, format)?,
    }
    debug!(path = %path.display(), ?format, "Saved image");
    Ok(())
}

/// Load the image at `path` and embed a fresh watermark into it.
pub fn mark_image<R: Rng + ?Sized>(
    path: &Path,
    config: WatermarkConfig,
    rng: &mut R,
) -> Result<(Rgb32FImage, Watermark)> {
    crate::algorithm::embed(&load(path)?, config, rng)
}

/// Extract the estimate of a watermark from the suspect image, given the original.
pub fn extract_from_image(
    original_path: &Path,
    suspect_path: &Path,
    config: WatermarkConfig,
) -> Result<Watermark> {
    crate::algorithm::extract(&load(original_path)?, &load(suspect_path)?, config)
}
