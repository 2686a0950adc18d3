//! RGBA drawing surface for figure composition.

use image::{Rgba, RgbImage, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

use crate::font::TextRenderer;
use crate::gradient::Color;

/// Axis-aligned rectangle in pixel coordinates (y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

/// Horizontal anchor for text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Drawing surface backed by an RGBA image.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background.to_rgba()),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let p = self.image.get_pixel(x, y);
        Some(Color::new(p[0], p[1], p[2], p[3]))
    }

    /// Flatten to RGB for encoding.
    pub fn into_rgb(self) -> RgbImage {
        image::DynamicImage::ImageRgba8(self.image).to_rgb8()
    }

    /// Alpha-blend `color` over the pixel at `(x, y)`; out-of-bounds is ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        *dst = blend(*dst, color);
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let (x0, y0, x1, y1) = self.clip(rect);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, color);
            }
        }
    }

    pub fn stroke_rect(&mut self, rect: PixelRect, width: f32, color: Color) {
        let corners = [
            (rect.x, rect.y),
            (rect.right(), rect.y),
            (rect.right(), rect.bottom()),
            (rect.x, rect.bottom()),
        ];
        for i in 0..4 {
            self.line(corners[i], corners[(i + 1) % 4], width, color);
        }
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Color) {
        draw_thick_line(&mut self.image, from, to, width, color);
    }

    pub fn fill_circle(&mut self, center: (f32, f32), radius: f32, color: Color) {
        draw_filled_circle_mut(
            &mut self.image,
            (center.0.round() as i32, center.1.round() as i32),
            radius.round().max(1.0) as i32,
            color.to_rgba(),
        );
    }

    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        fill_polygon(&mut self.image, points, color);
    }

    /// Composite an RGBA raster of `width` x `height` pixels with its top-left
    /// corner at `(x0, y0)`.
    pub fn blit_rgba(&mut self, x0: i64, y0: i64, width: usize, height: usize, pixels: &[u8]) {
        for (i, px) in pixels.chunks_exact(4).take(width * height).enumerate() {
            if px[3] == 0 {
                continue;
            }
            let x = x0 + (i % width) as i64;
            let y = y0 + (i / width) as i64;
            self.blend_pixel(x, y, Color::new(px[0], px[1], px[2], px[3]));
        }
    }

    /// Draw text with its top edge at `y`, anchored horizontally at `x`.
    #[allow(clippy::too_many_arguments)]
    pub fn text(
        &mut self,
        fonts: &TextRenderer,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        align: Align,
    ) {
        let width = fonts.text_width(text, size);
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        fonts.draw(&mut self.image, text, left, y, size, color);
    }

    /// Draw text rotated a quarter turn counter-clockwise, centred on `(cx, cy)`.
    pub fn text_vertical(
        &mut self,
        fonts: &TextRenderer,
        text: &str,
        cx: f32,
        cy: f32,
        size: f32,
        color: Color,
    ) {
        let width = fonts.text_width(text, size).ceil() as u32 + 4;
        let height = (size * 1.3).ceil() as u32 + 4;
        let mut layer = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
        fonts.draw(&mut layer, text, 2.0, 2.0, size, color);

        let rotated = image::imageops::rotate270(&layer);
        let x0 = (cx - rotated.width() as f32 / 2.0).round() as i64;
        let y0 = (cy - rotated.height() as f32 / 2.0).round() as i64;
        let w = rotated.width() as usize;
        let h = rotated.height() as usize;
        self.blit_rgba(x0, y0, w, h, rotated.as_raw());
    }

    fn clip(&self, rect: PixelRect) -> (i64, i64, i64, i64) {
        let x0 = rect.x.round().max(0.0) as i64;
        let y0 = rect.y.round().max(0.0) as i64;
        let x1 = (rect.right().round() as i64).min(self.width() as i64);
        let y1 = (rect.bottom().round() as i64).min(self.height() as i64);
        (x0, y0, x1, y1)
    }
}

fn blend(dst: Rgba<u8>, src: Color) -> Rgba<u8> {
    match src.a {
        0 => dst,
        255 => src.to_rgba(),
        a => {
            let t = a as f32 / 255.0;
            let mix = |d: u8, s: u8| (d as f32 * (1.0 - t) + s as f32 * t).round() as u8;
            let out_a = (dst[3] as f32 + a as f32 * (1.0 - dst[3] as f32 / 255.0)).round() as u8;
            Rgba([mix(dst[0], src.r), mix(dst[1], src.g), mix(dst[2], src.b), out_a])
        }
    }
}

/// Draw a line segment `width` pixels wide.
pub(crate) fn draw_thick_line(
    img: &mut RgbaImage,
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    color: Color,
) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt();
    if width <= 1.5 || len < 0.5 {
        draw_line_segment_mut(img, from, to, color.to_rgba());
        return;
    }

    let (nx, ny) = (-dy / len * width / 2.0, dx / len * width / 2.0);
    fill_polygon(
        img,
        &[
            (from.0 + nx, from.1 + ny),
            (to.0 + nx, to.1 + ny),
            (to.0 - nx, to.1 - ny),
            (from.0 - nx, from.1 - ny),
        ],
        color,
    );
}

fn fill_polygon(img: &mut RgbaImage, points: &[(f32, f32)], color: Color) {
    let mut poly: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &(x, y) in points {
        let p = Point::new(x.round() as i32, y.round() as i32);
        if poly.last() != Some(&p) {
            poly.push(p);
        }
    }
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }

    match poly.len() {
        0 => {}
        1 | 2 => {
            let a = poly[0];
            let b = poly[poly.len() - 1];
            draw_line_segment_mut(
                img,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                color.to_rgba(),
            );
        }
        _ => draw_polygon_mut(img, &poly, color.to_rgba()),
    }
}
