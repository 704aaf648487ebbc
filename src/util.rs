use std::path::Path;

use crate::error::{Result, WatermarkError};

/// Write a coefficient buffer as a grayscale image, scaled to the full range.
pub fn dump_buffer_as_image(width: u32, height: u32, data: &[f64], path: &Path) -> Result<()> {
    if data.len() != (width as usize) * (height as usize) {
        return Err(WatermarkError::LengthMismatch {
            expected: (width as usize) * (height as usize),
            found: data.len(),
        });
    }
    // Skip DC gain to ensure we get something that's remotely viewable.
    let rest = || data.iter().skip(1).copied();
    let min = rest().min_by(|a, b| a.total_cmp(b)).unwrap_or(0.0);
    let max = rest().max_by(|a, b| a.total_cmp(b)).unwrap_or(0.0);
    let range = if max > min { max - min } else { 1.0 };

    let y_img = image::GrayImage::from_fn(width, height, |x, y| {
        let v = data[(y * width + x) as usize];
        image::Luma([(((v - min) / range).clamp(0.0, 1.0) * 255.0) as u8])
    });
    y_img.save(path)?;
    Ok(())
}
