//! Stride sampling for surface rendering.
//!
//! A surface drawn from a large grid is reduced to at most `max_count` rows
//! and columns by taking every `stride`-th sample and always keeping the last
//! one, so the drawn surface spans the full extent of the grid.

/// Sample indices for a dimension of `len` points drawn with at most
/// `max_count` points.
///
/// `stride = max(ceil(len / max_count), 1)`; the result is
/// `0, stride, 2 * stride, ...` below `len - 1`, followed by `len - 1`.
/// An empty dimension yields no indices and a single point yields `[0]`.
pub fn stride_indices(len: usize, max_count: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let max_count = max_count.max(1);
    let stride = len.div_ceil(max_count).max(1);

    let mut indices: Vec<usize> = (0..len - 1).step_by(stride).collect();
    indices.push(len - 1);
    indices
}

/// Gather `data[row][col]` for every sampled row and column.
///
/// Returns a row-major grid of `cols.len()` by `rows.len()` values. Indices
/// outside `width`/`height` read as NaN.
pub fn sample_grid(data: &[f32], width: usize, rows: &[usize], cols: &[usize]) -> Vec<f32> {
    let mut output = Vec::with_capacity(rows.len() * cols.len());
    for &r in rows {
        for &c in cols {
            let v = if c < width {
                data.get(r * width + c).copied().unwrap_or(f32::NAN)
            } else {
                f32::NAN
            };
            output.push(v);
        }
    }
    output
}

/// Minimum and maximum of the finite values, or `None` when there are none.
pub fn finite_min_max(data: &[f32]) -> Option<(f32, f32)> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
