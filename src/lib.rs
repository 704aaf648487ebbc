//! Additive spread spectrum watermarking of images in the cosine transform domain.
//!
//! A watermark of normally distributed values is added to the largest coefficients of the
//! luminance DCT. Given the original image, the watermark can be estimated from a derived copy
//! and compared against the embedded one.

pub mod algorithm;
pub mod config;
pub mod dct2d;
pub mod error;
pub mod io;
pub mod record;
pub mod selection;
pub mod util;
pub mod watermark;
pub mod ycbcr;

// Export the public components from the algorithm here.
pub use algorithm::{embed, embed_seeded, extract, similarity};
pub use algorithm::{Reader, ReaderDerived};
pub use algorithm::{Similarity, Tester};
pub use algorithm::Writer;
pub use config::WatermarkConfig;
pub use error::{Result, WatermarkError};
pub use record::WatermarkRecord;
pub use selection::select_coefficients;
pub use watermark::Watermark;
