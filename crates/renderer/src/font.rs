//! Text drawing with a TrueType font or a built-in stroke font.
//!
//! A TrueType font is loaded with rusttype from a configured path or one of
//! the usual system locations. When none can be read, labels are drawn with
//! straight-segment glyphs covering digits, letters (upper case) and the
//! punctuation used in axis labels and titles.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};
use tracing::{debug, warn};

use crate::canvas::draw_thick_line;
use crate::gradient::Color;

/// Font files tried when no path is configured or it cannot be read.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Stroke glyph cell, as fractions of the font size.
const STROKE_ADVANCE: f32 = 0.72;
const STROKE_GLYPH_WIDTH: f32 = 0.5;
const STROKE_CAP_HEIGHT: f32 = 0.7;
const STROKE_TOP: f32 = 0.15;

pub enum TextRenderer {
    TrueType(Font<'static>),
    Stroke,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrueType(_) => f.write_str("TextRenderer::TrueType"),
            Self::Stroke => f.write_str("TextRenderer::Stroke"),
        }
    }
}

impl TextRenderer {
    /// Load a TrueType font, falling back to the stroke font.
    pub fn load(configured: Option<&Path>) -> Self {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = configured {
            candidates.push(path.to_path_buf());
        }
        candidates.extend(SYSTEM_FONT_PATHS.iter().map(PathBuf::from));

        for path in &candidates {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            match Self::from_bytes(bytes) {
                Some(renderer) => {
                    debug!(path = %path.display(), "Loaded font");
                    return renderer;
                }
                None => warn!(path = %path.display(), "Failed to parse font file"),
            }
        }

        if let Some(path) = configured {
            warn!(path = %path.display(), "Configured font unavailable, using stroke font");
        } else {
            debug!("No system font found, using stroke font");
        }
        Self::Stroke
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(bytes).map(Self::TrueType)
    }

    pub fn stroke() -> Self {
        Self::Stroke
    }

    /// Horizontal extent of `text` at `size` pixels.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        match self {
            Self::TrueType(font) => {
                let scale = Scale::uniform(size);
                let v = font.v_metrics(scale);
                font.layout(text, scale, point(0.0, v.ascent))
                    .last()
                    .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
                    .unwrap_or(0.0)
            }
            Self::Stroke => {
                let n = text.chars().count() as f32;
                if n == 0.0 {
                    0.0
                } else {
                    n * STROKE_ADVANCE * size - (STROKE_ADVANCE - STROKE_GLYPH_WIDTH) * size
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw(&self, img: &mut RgbaImage, text: &str, x: f32, y: f32, size: f32, color: Color) {
        match self {
            Self::TrueType(font) => {
                draw_text_mut(
                    img,
                    color.to_rgba(),
                    x.round() as i32,
                    y.round() as i32,
                    Scale::uniform(size),
                    font,
                    text,
                );
            }
            Self::Stroke => draw_stroke_text(img, text, x, y, size, color),
        }
    }
}

fn draw_stroke_text(img: &mut RgbaImage, text: &str, x: f32, y: f32, size: f32, color: Color) {
    let w = STROKE_GLYPH_WIDTH * size;
    let h = STROKE_CAP_HEIGHT * size;
    let top = y + STROKE_TOP * size;
    let line_width = (size * 0.08).max(1.0);

    for (i, ch) in text.chars().enumerate() {
        let left = x + i as f32 * STROKE_ADVANCE * size;
        for &(x0, y0, x1, y1) in stroke_glyph(ch) {
            draw_thick_line(
                img,
                (left + x0 * w, top + y0 * h),
                (left + x1 * w, top + y1 * h),
                line_width,
                color,
            );
        }
    }
}

type Segment = (f32, f32, f32, f32);

/// Segments of a glyph in a unit box, y growing downwards.
#[rustfmt::skip]
fn stroke_glyph(ch: char) -> &'static [Segment] {
    match ch.to_ascii_uppercase() {
        '0' => &[(0.0, 0.0, 1.0, 0.0), (1.0, 0.0, 1.0, 1.0), (1.0, 1.0, 0.0, 1.0), (0.0, 1.0, 0.0, 0.0), (0.0, 1.0, 1.0, 0.0)],
        '1' => &[(0.5, 0.0, 0.5, 1.0), (0.2, 0.25, 0.5, 0.0), (0.2, 1.0, 0.8, 1.0)],
        '2' => &[(0.0, 0.0, 1.0, 0.0), (1.0, 0.0, 1.0, 0.5), (1.0, 0.5, 0.0, 0.5), (0.0, 0.5, 0.0, 1.0), (0.0, 1.0, 1.0, 1.0)],
        '3' => &[(0.0, 0.0, 1.0, 0.0), (1.0, 0.0, 1.0, 1.0), (1.0, 1.0, 0.0, 1.0), (0.2, 0.5, 1.0, 0.5)],
        '4' => &[(0.0, 0.0, 0.0, 0.5), (0.0, 0.5, 1.0, 0.5), (1.0, 0.0, 1.0, 1.0)],
        '5' | 'S' => &[(1.0, 0.0, 0.0, 0.0), (0.0, 0.0, 0.0, 0.5), (0.0, 0.5, 1.0, 0.5), (1.0, 0.5, 1.0, 1.0), (1.0, 1.0, 0.0, 1.0)],
        '6' => &[(1.0, 0.0, 0.0, 0.0), (0.0, 0.0, 0.0, 1.0), (0.0, 1.0, 1.0, 1.0), (1.0, 1.0, 1.0, 0.5), (1.0, 0.5, 0.0, 0.5)],
        '7' => &[(0.0, 0.0, 1.0, 0.0), (1.0, 0.0, 0.4, 1.0)],
        '8' => &[(0.0, 0.0, 1.0, 0.0), (1.0, 0.0, 1.0, 1.0), (1.0, 1.0, 0.0, 1.0), (0.0, 1.0, 0.0, 0.0), (0.0, 0.5, 1.0, 0.5)],
        '9' => &[(1.0, 0.5, 0.0, 0.5), (0.0, 0.5, 0.0, 0.0), (0.0, 0.0, 1.0, 0.0), (1.0, 0.0, 1.0, 1.0), (1.0, 1.0, 0.0, 1.0)],
        'A' => &[(0.0, 1.0, 0.5, 0.0), (0.5, 0.0, 1.0, 1.0), (0.25, 0.5, 0.75, 0.5)],
        'B' => &[(0.0, 0.0, 0.0, 1.0), (0.0, 0.0, 0.8, 0.0), (0.8, 0.0, 1.0, 0.2), (1.0, 0.2, 1.0, 0.35), (1.0, 0.35, 0.8, 0.5), (0.0, 0.5, 0.8, 0.5), (0.8, 0.5, 1.0, 0.65), (1.0, 0.65, 1.0, 0.8), (1.0, 0.8, 0.8, 1.0), (0.8, 1.0, 0.0, 1.0)],
        'C' => &[(1.0, 0.0, 0.0, 0.0), (0.0, 0.0, 0.0, 1.0), (0.0, 1.0, 1.0, 1.0)],
        'D' => &[(0.0, 0.0, 0.0, 1.0), (0.0, 0.0, 0.6, 0.0), (0.6, 0.0, 1.0, 0.4), (1.0, 0.4, 1.0, 0.6), (1.0, 0.6, 0.6, 1.0), (0.6, 1.0, 0.0, 1.0)],
        'E' => &[(1.0, 0.0, 0.0, 0.0), (0.0, 0.0, 0.0, 1.0), (0.0, 1.0, 1.0, 1.0), (0.0, 0.5, 0.7, 0.5)],
        'F' => &[(1.0, 0.0, 0.0, 0.0), (0.0, 0.0, 0.0, 1.0), (0.0, 0.5, 0.7, 0.5)],
        'G' => &[(1.0, 0.0, 0.0, 0.0), (0.0, 0.0, 0.0, 1.0), (0.0, 1.0, 1.0, 1.0), (1.0, 1.0, 1.0, 0.5), (1.0, 0.5, 0.5, 0.5)],
        'H' => &[(0.0, 0.0, 0.0, 1.0), (1.0, 0.0, 1.0, 1.0), (0.0, 0.5, 1.0, 0.5)],
        'I' => &[(0.5, 0.0, 0.5, 1.0), (0.2, 0.0, 0.8, 0.0), (0.2, 1.0, 0.8, 1.0)],
        'J' => &[(1.0, 0.0, 1.0, 1.0), (1.0, 1.0, 0.0, 1.0), (0.0, 1.0, 0.0, 0.7)],
        'K' => &[(0.0, 0.0, 0.0, 1.0), (1.0, 0.0, 0.0, 0.5), (0.0, 0.5, 1.0, 1.0)],
        'L' => &[(0.0, 0.0, 0.0, 1.0), (0.0, 1.0, 1.0, 1.0)],
        'M' => &[(0.0, 1.0, 0.0, 0.0), (0.0, 0.0, 0.5, 0.5), (0.5, 0.5, 1.0, 0.0), (1.0, 0.0, 1.0, 1.0)],
        'N' => &[(0.0, 1.0, 0.0, 0.0), (0.0, 0.0, 1.0, 1.0), (1.0, 1.0, 1.0, 0.0)],
        'O' => &[(0.0, 0.0, 1.0, 0.0), (1.0, 0.0, 1.0, 1.0), (1.0, 1.0, 0.0, 1.0), (0.0, 1.0, 0.0, 0.0)],
        'P' => &[(0.0, 1.0, 0.0, 0.0), (0.0, 0.0, 1.0, 0.0), (1.0, 0.0, 1.0, 0.5), (1.0, 0.5, 0.0, 0.5)],
        'Q' => &[(0.0, 0.0, 1.0, 0.0), (1.0, 0.0, 1.0, 1.0), (1.0, 1.0, 0.0, 1.0), (0.0, 1.0, 0.0, 0.0), (0.6, 0.7, 1.0, 1.1)],
        'R' => &[(0.0, 1.0, 0.0, 0.0), (0.0, 0.0, 1.0, 0.0), (1.0, 0.0, 1.0, 0.5), (1.0, 0.5, 0.0, 0.5), (0.4, 0.5, 1.0, 1.0)],
        'T' => &[(0.0, 0.0, 1.0, 0.0), (0.5, 0.0, 0.5, 1.0)],
        'U' => &[(0.0, 0.0, 0.0, 1.0), (0.0, 1.0, 1.0, 1.0), (1.0, 1.0, 1.0, 0.0)],
        'V' => &[(0.0, 0.0, 0.5, 1.0), (0.5, 1.0, 1.0, 0.0)],
        'W' => &[(0.0, 0.0, 0.25, 1.0), (0.25, 1.0, 0.5, 0.5), (0.5, 0.5, 0.75, 1.0), (0.75, 1.0, 1.0, 0.0)],
        'X' => &[(0.0, 0.0, 1.0, 1.0), (1.0, 0.0, 0.0, 1.0)],
        'Y' => &[(0.0, 0.0, 0.5, 0.5), (1.0, 0.0, 0.5, 0.5), (0.5, 0.5, 0.5, 1.0)],
        'Z' => &[(0.0, 0.0, 1.0, 0.0), (1.0, 0.0, 0.0, 1.0), (0.0, 1.0, 1.0, 1.0)],
        '.' => &[(0.45, 0.92, 0.55, 0.92), (0.5, 0.88, 0.5, 1.0)],
        ',' => &[(0.5, 0.85, 0.35, 1.15)],
        ':' => &[(0.5, 0.2, 0.5, 0.3), (0.5, 0.8, 0.5, 0.9)],
        '-' => &[(0.15, 0.5, 0.85, 0.5)],
        '+' => &[(0.15, 0.5, 0.85, 0.5), (0.5, 0.15, 0.5, 0.85)],
        '=' => &[(0.15, 0.35, 0.85, 0.35), (0.15, 0.65, 0.85, 0.65)],
        '/' => &[(1.0, 0.0, 0.0, 1.0)],
        '_' => &[(0.0, 1.1, 1.0, 1.1)],
        '(' => &[(0.7, 0.0, 0.4, 0.3), (0.4, 0.3, 0.4, 0.7), (0.4, 0.7, 0.7, 1.0)],
        ')' => &[(0.3, 0.0, 0.6, 0.3), (0.6, 0.3, 0.6, 0.7), (0.6, 0.7, 0.3, 1.0)],
        '[' => &[(0.7, 0.0, 0.35, 0.0), (0.35, 0.0, 0.35, 1.0), (0.35, 1.0, 0.7, 1.0)],
        ']' => &[(0.3, 0.0, 0.65, 0.0), (0.65, 0.0, 0.65, 1.0), (0.65, 1.0, 0.3, 1.0)],
        _ => &[],
    }
}
