//! Parameters shared by the embedding and the extraction side.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatermarkError};

/// Configuration to embed and extract watermarks with.
///
/// Both sides must use the same values; the length determines how many coefficients are
/// selected, the alpha how strongly each of them is perturbed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Number of coefficients that carry the watermark, equal to the watermark length.
    pub length: usize,
    /// Perturbation strength, x_i' = x_i + alpha * w_i.
    pub alpha: f64,
}

impl Default for WatermarkConfig {
    /// Watermark of length 1000, embedded with an alpha of 0.1.
    fn default() -> Self {
        WatermarkConfig {
            length: 1000,
            alpha: 0.1,
        }
    }
}

impl WatermarkConfig {
    pub fn new(length: usize, alpha: f64) -> Self {
        WatermarkConfig { length, alpha }
    }

    /// Check the configuration against an image with `coefficient_count` coefficients.
    ///
    /// An alpha of exactly zero is accepted here, embedding with it is reported as a degenerate
    /// watermark instead.
    pub fn validate(&self, coefficient_count: usize) -> Result<()> {
        if self.length == 0 {
            return Err(WatermarkError::InvalidConfiguration(
                "watermark length must be positive".to_string(),
            ));
        }
        if self.length > coefficient_count {
            return Err(WatermarkError::InvalidConfiguration(format!(
                "watermark length {} exceeds the {} available coefficients",
                self.length, coefficient_count
            )));
        }
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(WatermarkError::InvalidConfiguration(format!(
                "alpha must be a finite non-negative number, got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// Like [`WatermarkConfig::validate`], but also rejects a zero alpha, the extraction divides
    /// by it.
    pub fn validate_for_extraction(&self, coefficient_count: usize) -> Result<()> {
        self.validate(coefficient_count)?;
        if self.alpha == 0.0 {
            return Err(WatermarkError::InvalidConfiguration(
                "alpha must be positive to extract a watermark".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = WatermarkConfig::default();
        assert_eq!(config.length, 1000);
        assert!(config.validate(256 * 256).is_ok());
        assert!(config.validate_for_extraction(256 * 256).is_ok());
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(
            WatermarkConfig::new(0, 0.1).validate(10),
            Err(WatermarkError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            WatermarkConfig::new(11, 0.1).validate(10),
            Err(WatermarkError::InvalidConfiguration(_))
        ));
        assert!(WatermarkConfig::new(10, 0.1).validate(10).is_ok());
    }

    #[test]
    fn test_alpha_bounds() {
        for alpha in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                WatermarkConfig::new(5, alpha).validate(10),
                Err(WatermarkError::InvalidConfiguration(_))
            ));
        }
        let zero = WatermarkConfig::new(5, 0.0);
        assert!(zero.validate(10).is_ok());
        assert!(matches!(
            zero.validate_for_extraction(10),
            Err(WatermarkError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = WatermarkConfig::new(300, 0.25);
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(text, r#"{"length":300,"alpha":0.25}"#);
    }
}
