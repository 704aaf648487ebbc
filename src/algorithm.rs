//! Contains the actual logic that ties everything together.
//!
//! This algorithm is described in the following paper:
//! J. Cox, J. Kilian, F. T. Leighton and T. Shamoon,
//! "Secure spread spectrum watermarking for multimedia,"
//! in IEEE Transactions on Image Processing, vol. 6, no. 12, pp. 1673-1687, Dec. 1997,
//! doi: 10.1109/83.650120.
//!
//! The main steps in the algorithm are:
//! - Convert the image to YCbCr color space.
//! - Compute the discrete cosine transform on the Y channel.
//! - Select the largest coefficients.
//! - Embed the watermark in the coefficients additively, x_i' = x_i + alpha * w_i.
//! - Perform the inverted discrete cosine transform using the updated coefficients.
//! - Convert image back from YCbCr to RGB color space.
//!
//! Extraction is non-blind; the original image is needed to find the coefficients and to subtract
//! their original values. The coefficient ranking is always computed on the original image, the
//! derived image only provides the values at those positions.

use image::Rgb32FImage;
use rand::{Rng, SeedableRng};
use rustdct::DctPlanner;
use tracing::{debug, instrument, warn};

use crate::config::WatermarkConfig;
use crate::dct2d::{dct2_2d, Type};
use crate::error::{Result, WatermarkError};
use crate::selection::select_coefficients;
use crate::watermark::Watermark;
use crate::ycbcr::{gray, YCbCrImage};

/// A sample counts as changed by the embedding if it moved more than this, on the `[0, 1]` scale.
const UNCHANGED_TOLERANCE: f32 = 1e-7;

fn dimensions(image: &Rgb32FImage) -> (u32, u32) {
    (image.width(), image.height())
}

fn coefficient_count(image: &Rgb32FImage) -> usize {
    image.width() as usize * image.height() as usize
}

/// Writer to embed a watermark into an image.
pub struct Writer {
    original: Rgb32FImage,
    image: YCbCrImage,
    planner: DctPlanner<f64>,
    indices: Vec<usize>,
    config: WatermarkConfig,
}

impl Writer {
    /// Create a writer, converting the image and performing the dct on its luminance.
    pub fn new(image: Rgb32FImage, config: WatermarkConfig) -> Result<Self> {
        config.validate(coefficient_count(&image))?;
        let mut v = Writer {
            image: (&image).into(), // convert to YCbCr color space
            original: image,
            planner: DctPlanner::<f64>::new(),
            indices: vec![],
            config,
        };
        v.perform_dct(); // perform DCT on Y channel.
        v.indices = select_coefficients(v.image.y(), config.length)?;
        debug!(
            width = v.image.width(),
            height = v.image.height(),
            length = config.length,
            "Selected coefficients"
        );
        Ok(v)
    }

    /// The luminance coefficients of the original image.
    pub fn coefficients(&self) -> &[f64] {
        self.image.y()
    }

    /// Positions of the coefficients that will carry the watermark, largest first.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The configuration this writer embeds with.
    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// Perform the DCT on the Y channel.
    fn perform_dct(&mut self) {
        let width = self.image.width() as usize;
        let height = self.image.height() as usize;
        dct2_2d(
            &mut self.planner,
            Type::DCT2,
            width,
            height,
            self.image.y_mut(),
        );
    }

    /// Draw a fresh watermark from `rng`, embed it and return the marked image with the watermark.
    ///
    /// The watermark is the only record of what was embedded, it must be retained to test derived
    /// images later on.
    pub fn mark<R: Rng + ?Sized>(self, rng: &mut R) -> Result<(Rgb32FImage, Watermark)> {
        let watermark = Watermark::generate_normal(self.config.length, rng);
        let marked = self.mark_with(&watermark)?;
        Ok((marked, watermark))
    }

    /// Embed the provided watermark and return the marked image.
    pub fn mark_with(mut self, watermark: &Watermark) -> Result<Rgb32FImage> {
        if watermark.len() != self.config.length {
            return Err(WatermarkError::LengthMismatch {
                expected: self.config.length,
                found: watermark.len(),
            });
        }
        Self::embed_watermark(
            self.image.y_mut(),
            &self.indices,
            self.config.alpha,
            watermark.data(),
        );
        self.result()
    }

    /// Consume the writer, performing the inverse dct and converting back to RGB.
    fn result(mut self) -> Result<Rgb32FImage> {
        let width = self.image.width() as usize;
        let height = self.image.height() as usize;

        // Convert back from cosine transform domain to real.
        dct2_2d(
            &mut self.planner,
            Type::DCT3,
            width,
            height,
            self.image.y_mut(),
        );

        let (marked, clamped) = self.image.to_rgb();
        if clamped > 0 {
            warn!(clamped, "Marked samples clamped into the valid range");
        }

        let unchanged = marked
            .as_raw()
            .iter()
            .zip(self.original.as_raw().iter())
            .all(|(a, b)| (a - b).abs() <= UNCHANGED_TOLERANCE);
        if unchanged {
            return Err(WatermarkError::DegenerateWatermark {
                length: self.config.length,
                alpha: self.config.alpha,
            });
        }
        Ok(marked)
    }

    /// Modify the coefficients at the indices, coefficient `indices[k]` receives `watermark[k]`.
    fn embed_watermark(coefficients: &mut [f64], indices: &[usize], alpha: f64, watermark: &[f64]) {
        for (index, value) in indices.iter().zip(watermark) {
            coefficients[*index] += alpha * value;
        }
    }
}

/// Reader to be used for the base (original) image.
pub struct Reader {
    dimensions: (u32, u32),
    coefficients: Vec<f64>,
    indices: Vec<usize>,
    alpha: f64,
}

/// Reader to be used for the derived (suspect) image.
pub struct ReaderDerived {
    dimensions: (u32, u32),
    coefficients: Vec<f64>,
}

impl ReaderDerived {
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

/// Gray channel of the image in the cosine transform domain.
fn gray_coefficients(image: &Rgb32FImage) -> Vec<f64> {
    let mut coefficients = gray(image);
    dct2_2d(
        &mut DctPlanner::new(),
        Type::DCT2,
        image.width() as usize,
        image.height() as usize,
        &mut coefficients,
    );
    coefficients
}

impl Reader {
    /// Create a base reader from the original image.
    ///
    /// Its coefficients determine the positions and original values used to extract watermarks
    /// from derived images.
    pub fn base(original: &Rgb32FImage, config: WatermarkConfig) -> Result<Self> {
        config.validate_for_extraction(coefficient_count(original))?;
        let coefficients = gray_coefficients(original);
        let indices = select_coefficients(&coefficients, config.length)?;
        Ok(Reader {
            dimensions: dimensions(original),
            coefficients,
            indices,
            alpha: config.alpha,
        })
    }

    /// Create a derived reader for a suspect image.
    pub fn derived(suspect: &Rgb32FImage) -> ReaderDerived {
        ReaderDerived {
            dimensions: dimensions(suspect),
            coefficients: gray_coefficients(suspect),
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Extract the estimate of the watermark contained in the derived image.
    ///
    /// Element `k` of the result corresponds to element `k` of a watermark embedded with the same
    /// configuration.
    pub fn extract(&self, derived: &ReaderDerived) -> Result<Watermark> {
        if derived.dimensions != self.dimensions {
            return Err(WatermarkError::DimensionMismatch {
                expected: self.dimensions,
                found: derived.dimensions,
            });
        }
        let mut extracted = vec![0f64; self.indices.len()];
        Self::extract_watermark(
            &self.coefficients,
            &self.indices,
            self.alpha,
            &derived.coefficients,
            &mut extracted,
        );
        Ok(extracted.into())
    }

    /// Inverse of the embedding, w_i = (x_i' - x_i) / alpha.
    fn extract_watermark(
        base_coefficients: &[f64],
        indices: &[usize],
        alpha: f64,
        derived_coefficients: &[f64],
        extracted: &mut [f64],
    ) {
        for (value, index) in extracted.iter_mut().zip(indices) {
            *value = (derived_coefficients[*index] - base_coefficients[*index]) / alpha;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    pub similarity: f64,
}

impl Similarity {
    /// Returns true if the similarity exceeds more than n sigma's, if the watermarks are sampled
    /// from N(0, 1).
    pub fn exceeds_sigma(&self, n_sigma: f64) -> bool {
        self.similarity > n_sigma
    }
}

/// Test whether a watermark is present in the extracted signal.
pub struct Tester<'a> {
    extracted_watermark: &'a [f64],
}

impl<'a> Tester<'a> {
    pub fn new(extracted_watermark: &'a [f64]) -> Self {
        Tester {
            extracted_watermark,
        }
    }

    /// Similarity of the reference watermark with the extracted one.
    ///
    /// This is the dot product normalized by the norm of the extracted watermark only, so an
    /// unrelated N(0, 1) reference yields a N(0, 1) distributed value.
    pub fn similarity(&self, reference: &[f64]) -> Result<Similarity> {
        if reference.len() != self.extracted_watermark.len() {
            return Err(WatermarkError::LengthMismatch {
                expected: self.extracted_watermark.len(),
                found: reference.len(),
            });
        }
        // extracted is X*
        let mut nominator = 0.0;
        let mut denominator = 0.0;
        for (extracted, comparison) in self.extracted_watermark.iter().zip(reference.iter()) {
            nominator += extracted * comparison;
            denominator += extracted * extracted;
        }
        if denominator == 0.0 {
            return Err(WatermarkError::UndefinedSimilarity);
        }
        Ok(Similarity {
            similarity: nominator / f64::sqrt(denominator),
        })
    }
}

/// Embed a fresh watermark into `original`, drawing it from `rng`.
#[instrument(skip_all, fields(width = original.width(), height = original.height(), length = config.length, alpha = config.alpha))]
pub fn embed<R: Rng + ?Sized>(
    original: &Rgb32FImage,
    config: WatermarkConfig,
    rng: &mut R,
) -> Result<(Rgb32FImage, Watermark)> {
    Writer::new(original.clone(), config)?.mark(rng)
}

/// Like [`embed`], with a generator seeded from `seed`, or from the operating system if absent.
pub fn embed_seeded(
    original: &Rgb32FImage,
    config: WatermarkConfig,
    seed: Option<u64>,
) -> Result<(Rgb32FImage, Watermark)> {
    let mut rng = match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };
    embed(original, config, &mut rng)
}

/// Extract the estimate of a watermark from `suspect`, using `original` as the base.
#[instrument(skip_all, fields(width = original.width(), height = original.height(), length = config.length))]
pub fn extract(
    original: &Rgb32FImage,
    suspect: &Rgb32FImage,
    config: WatermarkConfig,
) -> Result<Watermark> {
    let reader = Reader::base(original, config)?;
    reader.extract(&Reader::derived(suspect))
}

/// Similarity between a reference watermark and a candidate extracted from a suspect image.
///
/// Fails with [`WatermarkError::UndefinedSimilarity`] if the candidate is all zeros, which is what
/// extracting from an unmodified copy of the original yields.
pub fn similarity(reference: &[f64], candidate: &[f64]) -> Result<f64> {
    Ok(Tester::new(candidate).similarity(reference)?.similarity)
}
