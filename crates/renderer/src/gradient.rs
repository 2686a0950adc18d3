//! Colormaps and value normalization for gridded data.

use crate::error::{RenderError, RenderResult};
use crate::style::{even_stops, hex_to_rgb, ColorStop};

/// The 9-class sequential Blues ramp, light to dark.
const BLUES: [&str; 9] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_hex(hex: &str) -> RenderResult<Self> {
        let (r, g, b) = hex_to_rgb(hex).ok_or_else(|| RenderError::InvalidColor(hex.to_string()))?;
        Ok(Self::rgb(r, g, b))
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Scale the RGB channels by `factor`, keeping alpha.
    pub fn shade(&self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * f).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b), self.a)
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (a as f32 * t_inv + b as f32 * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Linear mapping of data values onto `0..=1`, clipped at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f32,
    pub vmax: f32,
}

impl Normalize {
    pub fn new(vmin: f32, vmax: f32) -> Self {
        Self { vmin, vmax }
    }

    /// Normalized value, or NaN for NaN input.
    pub fn apply(&self, value: f32) -> f32 {
        if value.is_nan() {
            return f32::NAN;
        }
        let range = self.vmax - self.vmin;
        if range.abs() < f32::EPSILON {
            return 0.0;
        }
        ((value - self.vmin) / range).clamp(0.0, 1.0)
    }
}

/// Piecewise-linear colormap over `0..=1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<(f32, Color)>,
    bad: Color,
}

impl Colormap {
    /// Build a colormap from color stops.
    ///
    /// Stop values may use any scale; they are sorted and rescaled so the
    /// first stop sits at 0 and the last at 1.
    pub fn from_stops(stops: &[ColorStop]) -> RenderResult<Self> {
        if stops.is_empty() {
            return Err(RenderError::invalid_parameter("colormap needs at least one stop"));
        }

        let mut parsed = stops
            .iter()
            .map(|s| Ok((s.value, Color::from_hex(&s.color)?)))
            .collect::<RenderResult<Vec<_>>>()?;
        if parsed.iter().any(|(v, _)| !v.is_finite()) {
            return Err(RenderError::invalid_parameter("colormap stop values must be finite"));
        }
        parsed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let lo = parsed[0].0;
        let span = parsed[parsed.len() - 1].0 - lo;
        let stops = parsed
            .into_iter()
            .map(|(v, c)| {
                let pos = if span > 0.0 { (v - lo) / span } else { 0.0 };
                (pos, c)
            })
            .collect();

        Ok(Self {
            stops,
            bad: Color::transparent(),
        })
    }

    /// Sequential white-to-dark-blue ramp.
    pub fn blues() -> Self {
        let stops = BLUES
            .iter()
            .enumerate()
            .filter_map(|(i, hex)| {
                let (r, g, b) = hex_to_rgb(hex)?;
                Some((i as f32 / (BLUES.len() - 1) as f32, Color::rgb(r, g, b)))
            })
            .collect();
        Self {
            stops,
            bad: Color::transparent(),
        }
    }

    /// Reversed Blues: dark blue for low values, white for high values.
    pub fn blues_r() -> Self {
        Self::blues().reversed()
    }

    /// Look up a named built-in colormap.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "Blues" => Some(Self::blues()),
            "Blues_r" => Some(Self::blues_r()),
            "Greys" => Self::from_stops(&even_stops(&["#ffffff", "#000000"])).ok(),
            "Greys_r" => Self::from_stops(&even_stops(&["#000000", "#ffffff"])).ok(),
            _ => None,
        }
    }

    /// The same ramp traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        let stops = self
            .stops
            .iter()
            .rev()
            .map(|&(pos, c)| (1.0 - pos, c))
            .collect();
        Self {
            stops,
            bad: self.bad,
        }
    }

    /// Color used for NaN values.
    pub fn with_bad(mut self, bad: Color) -> Self {
        self.bad = bad;
        self
    }

    /// Color at normalized position `t`; values outside `0..=1` clip to the
    /// end colors and NaN maps to the bad color.
    pub fn map(&self, t: f32) -> Color {
        if t.is_nan() {
            return self.bad;
        }
        let t = t.clamp(0.0, 1.0);

        let first = self.stops[0];
        if t <= first.0 {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if t <= p1 {
                let span = p1 - p0;
                let local = if span > 0.0 { (t - p0) / span } else { 0.0 };
                return interpolate_color(c0, c1, local);
            }
        }
        self.stops[self.stops.len() - 1].1
    }

    /// Color for a raw data value under `norm`.
    pub fn map_value(&self, value: f32, norm: &Normalize) -> Color {
        self.map(norm.apply(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blues_r_ends() {
        let cmap = Colormap::blues_r();
        assert_eq!(cmap.map(0.0), Color::rgb(0x08, 0x30, 0x6b));
        assert_eq!(cmap.map(1.0), Color::rgb(0xf7, 0xfb, 0xff));
        assert!(cmap.map(f32::NAN).is_transparent());
    }

    #[test]
    fn test_normalize_clips() {
        let norm = Normalize::new(0.0, 3.5);
        assert_eq!(norm.apply(-1.0), 0.0);
        assert_eq!(norm.apply(7.0), 1.0);
        assert!((norm.apply(1.75) - 0.5).abs() < 1e-6);
        assert!(norm.apply(f32::NAN).is_nan());
    }
}
