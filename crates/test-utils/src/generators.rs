//! Synthetic snow depth and elevation grids.
//!
//! All grids are row-major `width * height` vectors of `f32`, the layout
//! the loaders produce.

/// Every cell set to `value`.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Snow depth in meters for a day of the season.
///
/// Depth grows with `day` and towards the southern (last) rows and is capped
/// at 3.5 m, so consecutive frames differ.
pub fn create_snow_grid(width: usize, height: usize, day: usize) -> Vec<f32> {
    let base = (0.1 + 0.05 * day as f32) * 3.0;
    (0..height)
        .flat_map(|row| {
            let south = (row as f32 + 1.0) / height.max(1) as f32;
            (0..width).map(move |col| {
                let east = 0.9 + 0.2 * col as f32 / width.max(1) as f32;
                (base * south * east).min(3.5)
            })
        })
        .collect()
}

/// Creates a single-peak terrain (meters): 4000 m in the center falling to
/// about 3000 m at the corners.
pub fn create_mountain_dem(width: usize, height: usize) -> Vec<f32> {
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    let max_r = (cx * cx + cy * cy).sqrt().max(1.0);

    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dx = col as f32 - cx;
            let dy = row as f32 - cy;
            let r = (dx * dx + dy * dy).sqrt() / max_r;
            data.push(4000.0 - 1000.0 * r);
        }
    }
    data
}

/// Creates a mountain terrain with deterministic high-frequency noise of
/// +/- `amplitude` meters, useful for checking that smoothing removes it.
pub fn create_noisy_dem(width: usize, height: usize, amplitude: f32, seed: u32) -> Vec<f32> {
    let mut state = seed.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    create_mountain_dem(width, height)
        .into_iter()
        .map(|v| {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let unit = (state as f32 / u32::MAX as f32) * 2.0 - 1.0;
            v + unit * amplitude
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snow_grid_bounds() {
        for day in [0, 10, 100] {
            let grid = create_snow_grid(20, 10, day);
            assert!(grid.iter().all(|v| (0.0..=3.5).contains(v)));
        }
    }

    #[test]
    fn test_mountain_peak_in_center() {
        let dem = create_mountain_dem(11, 11);
        let center = dem[5 * 11 + 5];
        assert_eq!(center, 4000.0);
        assert!(dem[0] < center);
    }

    #[test]
    fn test_noisy_dem_is_deterministic() {
        assert_eq!(create_noisy_dem(8, 8, 50.0, 7), create_noisy_dem(8, 8, 50.0, 7));
        assert_ne!(create_noisy_dem(8, 8, 50.0, 7), create_noisy_dem(8, 8, 50.0, 8));
    }
}
