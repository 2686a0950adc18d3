//! Tick placement and labelling for panel axes.

/// Evenly spaced "round" tick values covering `min..=max`.
///
/// The step is 1, 2, 5 or 10 times a power of ten, chosen so roughly
/// `target` ticks fit the range.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if max <= min {
        return vec![min];
    }

    let step = nice_step(min, max, target);
    let first = (min / step).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Step used by [`nice_ticks`] for the same arguments.
pub fn nice_step(min: f64, max: f64, target: usize) -> f64 {
    let raw = (max - min) / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .find(|&n| n >= fraction - 1e-9)
        .unwrap_or(10.0);
    nice * magnitude
}

/// Format a tick value with just enough decimals for `step`.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    // avoid "-0"
    let value = if value.abs() < step * 1e-6 { 0.0 } else { value };
    format!("{:.*}", decimals, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_ticks_colorbar_range() {
        let ticks = nice_ticks(0.0, 3.5, 7);
        assert_eq!(ticks, vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5]);
    }

    #[test]
    fn test_nice_ticks_projected_range() {
        let ticks = nice_ticks(255_120.0, 265_880.0, 8);
        assert_eq!(ticks, vec![256_000.0, 258_000.0, 260_000.0, 262_000.0, 264_000.0]);
    }

    #[test]
    fn test_nice_ticks_degenerate() {
        assert_eq!(nice_ticks(2.0, 2.0, 5), vec![2.0]);
        assert!(nice_ticks(f64::NAN, 1.0, 5).is_empty());
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.5, 0.5), "0.5");
        assert_eq!(format_tick(3.0, 0.5), "3.0");
        assert_eq!(format_tick(258_000.0, 2000.0), "258000");
        assert_eq!(format_tick(-1e-12, 0.5), "0.0");
    }
}
