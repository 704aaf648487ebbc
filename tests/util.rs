#![allow(dead_code)]
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use spectral_watermark as wm;

pub fn generate_fixed_normal_sequence(seed: u64, length: usize) -> Vec<f64> {
    use rand::prelude::*;
    use rand_distr::StandardNormal;
    let mut generator = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(length);
    data.resize_with(length, || generator.sample(StandardNormal));
    data
}

/// Smooth color pattern with some fixed texture, samples stay well inside `[0.15, 0.85]`.
pub fn textured_image(width: u32, height: u32, seed: u64) -> image::Rgb32FImage {
    use rand::prelude::*;
    let mut generator = ChaCha8Rng::seed_from_u64(seed);
    image::Rgb32FImage::from_fn(width, height, |x, y| {
        let (fx, fy) = (x as f32, y as f32);
        let base = 0.5 + 0.15 * (fx * 0.11).sin() * (fy * 0.07).cos();
        let mut texture = || generator.gen_range(-0.05f32..0.05);
        image::Rgb([
            base + texture() + 0.1 * (fx / width as f32 - 0.5),
            base + texture(),
            base + texture() - 0.1 * (fy / height as f32 - 0.5),
        ])
    })
}

/// Add zero mean gaussian noise with the given standard deviation on the 8 bit scale.
pub fn add_noise(image: &image::Rgb32FImage, sigma: f32, seed: u64) -> image::Rgb32FImage {
    use rand::prelude::*;
    use rand_distr::Normal;
    let mut generator = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0f32, sigma / 255.0).expect("valid sigma");
    let mut out = image.clone();
    for v in out.iter_mut() {
        *v = (*v + generator.sample(noise)).clamp(0.0, 1.0);
    }
    out
}

pub fn norm(data: &[f64]) -> f64 {
    data.iter().map(|x| x * x).sum::<f64>().sqrt()
}

pub fn embed_watermark_into(
    image: &image::Rgb32FImage,
    config: wm::WatermarkConfig,
    seed: u64,
) -> (image::Rgb32FImage, wm::Watermark) {
    let mut generator = ChaCha8Rng::seed_from_u64(seed);
    wm::embed(image, config, &mut generator).expect("embedding succeeds")
}
