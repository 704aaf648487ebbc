use serde::{Deserialize, Serialize};

/// Watermark to be embedded, a sequence of floats.
///
/// The paper recommends using a 0 mean sigma^2 = 1 standard distribution to determine the sequence
/// to be embedded.
/// See paper section IV-D as to why using a binary signal is vulnerable to multi document attacks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watermark {
    data: Vec<f64>,
}

impl Watermark {
    /// Generate a new random watermark from a standard normal distribution.
    pub fn generate_normal<R: rand::Rng + ?Sized>(length: usize, rng: &mut R) -> Self {
        use rand_distr::StandardNormal;

        let mut data = Vec::with_capacity(length);
        data.resize_with(length, || rng.sample(StandardNormal));
        Watermark { data }
    }

    /// Create a new watermark, populating it from the data slice.
    pub fn from_slice(data: &[f64]) -> Self {
        Watermark {
            data: data.to_vec(),
        }
    }

    /// Retrieve the data in this watermark.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

}

impl From<Vec<f64>> for Watermark {
    fn from(data: Vec<f64>) -> Self {
        Watermark { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_generate_seeded() {
        let mut a = rand::rngs::StdRng::seed_from_u64(3);
        let mut b = rand::rngs::StdRng::seed_from_u64(3);
        let first = Watermark::generate_normal(100, &mut a);
        assert_eq!(first, Watermark::generate_normal(100, &mut b));
        assert_eq!(first.len(), 100);
        // Continuing from the same generator gives a different mark.
        assert_ne!(first, Watermark::generate_normal(100, &mut a));
    }

    #[test]
    fn test_standard_normal() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mark = Watermark::generate_normal(20000, &mut rng);
        let n = mark.len() as f64;
        let mean = mark.data().iter().sum::<f64>() / n;
        let variance = mark.data().iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((variance - 1.0).abs() < 0.05, "variance {variance}");
    }

    #[test]
    fn test_serializes_as_sequence() {
        let mark = Watermark::from_slice(&[1.0, -0.5]);
        let text = serde_json::to_string(&mark).unwrap();
        assert_eq!(text, "[1.0,-0.5]");
        let back: Watermark = serde_json::from_str(&text).unwrap();
        assert_eq!(back, mark);
    }
}
