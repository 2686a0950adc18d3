//! Gaussian smoothing of 2D grids.

use rayon::prelude::*;

use crate::error::{GridError, GridResult};

/// Kernel half-width in standard deviations.
pub const DEFAULT_TRUNCATE: f64 = 4.0;

/// Build a normalized 1D Gaussian kernel of radius `round(truncate * sigma)`.
///
/// The kernel has `2 * radius + 1` taps and sums to 1.
pub fn gaussian_kernel(sigma: f64, truncate: f64) -> Vec<f64> {
    let radius = (truncate * sigma + 0.5) as isize;
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();

    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Smooth a row-major grid with a separable Gaussian filter.
///
/// Edges are handled by reflection about the edge (`d c b a | a b c d`), the
/// kernel extends `truncate` standard deviations each way, and the arithmetic
/// is done in f64. NaN cells propagate to their neighbourhood. A `sigma` of
/// zero or less returns the input unchanged.
pub fn gaussian_filter(
    data: &[f32],
    width: usize,
    height: usize,
    sigma: f64,
    truncate: f64,
) -> GridResult<Vec<f32>> {
    if data.len() != width * height {
        return Err(GridError::shape_mismatch(width, height, data.len()));
    }
    if !sigma.is_finite() {
        return Err(GridError::invalid_parameter(format!("sigma must be finite, got {}", sigma)));
    }
    if !truncate.is_finite() || truncate < 0.0 {
        return Err(GridError::invalid_parameter(format!(
            "truncate must be finite and >= 0, got {}",
            truncate
        )));
    }
    if sigma <= 0.0 || data.is_empty() {
        return Ok(data.to_vec());
    }

    let kernel = gaussian_kernel(sigma, truncate);
    let radius = (kernel.len() / 2) as isize;

    // Horizontal pass, one row per task
    let mut tmp = vec![0.0f64; data.len()];
    tmp.par_chunks_mut(width)
        .zip(data.par_chunks(width))
        .for_each(|(out, src)| {
            for (x, slot) in out.iter_mut().enumerate() {
                let mut acc = 0.0;
                for (k, w) in kernel.iter().enumerate() {
                    let sx = reflect(x as isize + k as isize - radius, width);
                    acc += w * src[sx] as f64;
                }
                *slot = acc;
            }
        });

    // Vertical pass, accumulating whole source rows into each output row
    let mut out = vec![0.0f32; data.len()];
    out.par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out_row)| {
            let mut acc = vec![0.0f64; width];
            for (k, w) in kernel.iter().enumerate() {
                let sy = reflect(row as isize + k as isize - radius, height);
                let src = &tmp[sy * width..(sy + 1) * width];
                for (a, v) in acc.iter_mut().zip(src) {
                    *a += w * v;
                }
            }
            for (o, a) in out_row.iter_mut().zip(acc) {
                *o = a as f32;
            }
        });

    Ok(out)
}

/// Mirror an out-of-range index back into `0..n`, repeating the edge sample.
fn reflect(i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let m = i.rem_euclid(period);
    if m >= n {
        (period - m - 1) as usize
    } else {
        m as usize
    }
}
