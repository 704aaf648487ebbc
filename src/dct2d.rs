use rustdct::DctPlanner;

// https://github.com/mpizenberg/fft2d exists, but it only does the unnormalized transforms, the
// orthonormal scaling is applied here per row / column instead.

/*
The forward transform matches:

    dct = lambda x: scipy.fftpack.dct(x, norm='ortho')
    in_dct = dct(dct(y.T).T)

And the inverse:

    idct = lambda x: scipy.fftpack.idct(x, norm='ortho')
    y = idct(idct(in_dct.T).T)

rustdct computes the DCT-II without scaling, y_k = \Sum_{n=0}^{N-1} x_n \cos(\pi k (2n + 1) / 2N).
Orthonormal means multiplying y_0 by sqrt(1/N) and all other terms by sqrt(2/N). The DCT-III of
rustdct halves the first term, so the inverse scales x_0 by 2 * sqrt(1/N) before transforming.
*/

/// Direction of the transform.
#[allow(clippy::upper_case_acronyms)]
#[derive(PartialEq, Debug, Copy, Clone)]
pub enum Type {
    /// Forward transform, orthonormal DCT-II.
    DCT2,
    /// Inverse transform, orthonormal DCT-III.
    DCT3,
}

#[derive(PartialEq, Debug, Copy, Clone)]
enum Direction {
    Row,
    Column,
}

/// Perform an orthonormal two dimensional discrete cosine transform in place.
///
/// Data is assumed to be ordered row first, `height` rows of `width` values each, and will be
/// overwritten with the result.
pub fn dct2_2d(
    planner: &mut DctPlanner<f64>,
    transform: Type,
    width: usize,
    height: usize,
    data: &mut [f64],
) {
    assert_eq!(data.len(), width * height);
    if data.is_empty() {
        return;
    }

    // Intermediate row / column storage and the scratch buffer, reused between directions.
    let mut tmp: Vec<f64> = vec![];
    let mut scratch: Vec<f64> = vec![];

    for current in [Direction::Row, Direction::Column] {
        // (number of lanes, lane length, distance between lane elements, distance between lanes)
        let (lanes, length, step, skip_mult) = match current {
            Direction::Row => (height, width, 1, width),
            Direction::Column => (width, height, width, 1),
        };

        let dct = planner.plan_dct2(length);
        tmp.resize(length, 0.0);
        scratch.resize(dct.get_scratch_len(), 0.0);

        let dc_scale = (1.0 / length as f64).sqrt();
        let ac_scale = (2.0 / length as f64).sqrt();

        for lane in 0..lanes {
            let offset = lane * skip_mult;
            for (i, v) in tmp.iter_mut().enumerate() {
                *v = data[offset + i * step];
            }

            match transform {
                Type::DCT2 => {
                    dct.process_dct2_with_scratch(&mut tmp, &mut scratch);
                    tmp[0] *= dc_scale;
                    tmp[1..].iter_mut().for_each(|v| *v *= ac_scale);
                }
                Type::DCT3 => {
                    tmp[0] *= 2.0 * dc_scale;
                    tmp[1..].iter_mut().for_each(|v| *v *= ac_scale);
                    dct.process_dct3_with_scratch(&mut tmp, &mut scratch);
                }
            }

            for (i, v) in tmp.iter().enumerate() {
                data[offset + i * step] = *v;
            }
        }
    }
}

/// Forward transform of a row-major matrix, returning a new buffer.
pub fn forward_transform(width: usize, height: usize, matrix: &[f64]) -> Vec<f64> {
    let mut out = matrix.to_vec();
    dct2_2d(&mut DctPlanner::new(), Type::DCT2, width, height, &mut out);
    out
}

/// Inverse of [`forward_transform`], returning a new buffer.
pub fn inverse_transform(width: usize, height: usize, matrix: &[f64]) -> Vec<f64> {
    let mut out = matrix.to_vec();
    dct2_2d(&mut DctPlanner::new(), Type::DCT3, width, height, &mut out);
    out
}
