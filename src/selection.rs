use crate::error::{Result, WatermarkError};

/// Obtain the positions of the `n` largest coefficients, ordered from large to small.
///
/// Coefficients are compared by their signed value, so the DC term and the largest positive
/// components are picked. Equal values are ordered by ascending position, which makes the result
/// a pure function of the coefficients; the extraction relies on that to find the positions the
/// embedding used.
pub fn select_coefficients(coefficients: &[f64], n: usize) -> Result<Vec<usize>> {
    if n > coefficients.len() {
        return Err(WatermarkError::InvalidConfiguration(format!(
            "cannot select {} of {} coefficients",
            n,
            coefficients.len()
        )));
    }
    if n == 0 {
        return Ok(vec![]);
    }

    let by_rank = |a: &(f64, usize), b: &(f64, usize)| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1));

    let mut coeff_index = coefficients
        .iter()
        .enumerate()
        .map(|(index, coeff)| (*coeff, index))
        .collect::<Vec<_>>();

    // Partition such that the first n are the largest, then only sort those.
    coeff_index.select_nth_unstable_by(n - 1, by_rank);
    coeff_index.truncate(n);
    coeff_index.sort_unstable_by(by_rank);

    Ok(coeff_index
        .iter()
        .map(|(_coeff, index)| *index)
        .collect())
}
