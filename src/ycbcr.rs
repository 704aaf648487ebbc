//! Conversion between RGB images and a full range (JFIF) YCbCr representation.
//!
//! Samples of an [`image::Rgb32FImage`] live in `[0, 1]`, the planes here are scaled to the
//! 8 bit range `[0, 255]` so coefficient magnitudes match those of an 8 bit image.

/// Scale between the float image samples and the planes.
pub const SAMPLE_SCALE: f64 = 255.0;

// ITU-R BT.601 luma weights.
const KR: f64 = 0.299;
const KG: f64 = 0.587;
const KB: f64 = 0.114;

// Chroma offset and scaling, Cb = (B - Y) / CB_SCALE + 128.
const CHROMA_OFFSET: f64 = 128.0;
const CB_SCALE: f64 = 2.0 * (1.0 - KB);
const CR_SCALE: f64 = 2.0 * (1.0 - KR);

fn luma_of(r: f64, g: f64, b: f64) -> f64 {
    KR * r + KG * g + KB * b
}

/// Planar YCbCr image, the luminance plane is what the watermark is written to.
#[derive(Debug, Clone)]
pub struct YCbCrImage {
    width: u32,
    height: u32,
    y: Vec<f64>,
    cb: Vec<f64>,
    cr: Vec<f64>,
}

impl YCbCrImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The luminance plane, row major.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn y_mut(&mut self) -> &mut [f64] {
        &mut self.y
    }

    pub fn cb(&self) -> &[f64] {
        &self.cb
    }

    pub fn cr(&self) -> &[f64] {
        &self.cr
    }

    /// Convert back to RGB, returning the image and the number of samples that had to be clamped
    /// into `[0, 1]`.
    pub fn to_rgb(&self) -> (image::Rgb32FImage, usize) {
        let mut out = image::Rgb32FImage::new(self.width, self.height);
        let mut clamped = 0;
        let planes = self.y.iter().zip(self.cb.iter()).zip(self.cr.iter());
        for (pixel, ((y, cb), cr)) in out.pixels_mut().zip(planes) {
            let r = y + (cr - CHROMA_OFFSET) * CR_SCALE;
            let b = y + (cb - CHROMA_OFFSET) * CB_SCALE;
            let g = (y - KR * r - KB * b) / KG;
            pixel.0 = [r, g, b].map(|v| {
                let v = v / SAMPLE_SCALE;
                let inside = v.clamp(0.0, 1.0);
                // Rounding noise around the bounds is not counted.
                if (v - inside).abs() > 1e-9 {
                    clamped += 1;
                }
                inside as f32
            });
        }
        (out, clamped)
    }
}

impl From<&image::Rgb32FImage> for YCbCrImage {
    fn from(img: &image::Rgb32FImage) -> Self {
        let count = img.width() as usize * img.height() as usize;
        let mut y = Vec::with_capacity(count);
        let mut cb = Vec::with_capacity(count);
        let mut cr = Vec::with_capacity(count);
        for pixel in img.pixels() {
            let [r, g, b] = pixel.0.map(|v| v as f64 * SAMPLE_SCALE);
            let luma = luma_of(r, g, b);
            y.push(luma);
            cb.push((b - luma) / CB_SCALE + CHROMA_OFFSET);
            cr.push((r - luma) / CR_SCALE + CHROMA_OFFSET);
        }
        YCbCrImage {
            width: img.width(),
            height: img.height(),
            y,
            cb,
            cr,
        }
    }
}

impl From<&YCbCrImage> for image::Rgb32FImage {
    /// Convert back to RGB, samples are clamped into `[0, 1]`.
    fn from(img: &YCbCrImage) -> Self {
        img.to_rgb().0
    }
}

/// Single channel gray representation of an image, on the same scale as the luminance plane.
pub fn gray(img: &image::Rgb32FImage) -> Vec<f64> {
    img.pixels()
        .map(|p| {
            let [r, g, b] = p.0.map(|v| v as f64 * SAMPLE_SCALE);
            luma_of(r, g, b)
        })
        .collect()
}
