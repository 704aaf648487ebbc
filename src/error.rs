use thiserror::Error;

/// Errors produced while embedding, extracting or scoring watermarks.
#[derive(Error, Debug)]
pub enum WatermarkError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Dimension mismatch: expected {expected:?}, found {found:?} (width, height)")]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },

    #[error(
        "Marked image is identical to the original (length={length}, alpha={alpha}); \
         increase alpha or the watermark length"
    )]
    DegenerateWatermark { length: usize, alpha: f64 },

    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Similarity is undefined for a zero candidate watermark")]
    UndefinedSimilarity,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WatermarkError>;
