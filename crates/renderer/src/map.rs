//! 2D map panel: colormapped grid with axes, colorbar and site marker.

use rayon::prelude::*;
use snow_common::{BoundingBox, GridSpec, Site};

use crate::axes::{format_tick, nice_step, nice_ticks};
use crate::canvas::{Align, Canvas, PixelRect};
use crate::error::{RenderError, RenderResult};
use crate::figure::Metrics;
use crate::font::TextRenderer;
use crate::gradient::{Color, Colormap, Normalize};

/// Tick count aimed for on each map axis.
const MAP_TICKS: usize = 5;

/// Tick count aimed for along the colorbar.
const COLORBAR_TICKS: usize = 7;

/// Inputs for one map panel.
pub struct MapPanel<'a> {
    pub grid: &'a GridSpec,
    pub values: &'a [f32],
    pub colormap: &'a Colormap,
    pub norm: Normalize,
    pub site: &'a Site,
    pub title: &'a str,
    pub colorbar_label: &'a str,
}

impl MapPanel<'_> {
    /// Draw the panel with the data in `plot` and the colorbar in `colorbar`.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        fonts: &TextRenderer,
        plot: PixelRect,
        colorbar: PixelRect,
        metrics: &Metrics,
    ) -> RenderResult<()> {
        if self.grid.check_len(self.values.len()).is_err() {
            return Err(RenderError::shape_mismatch(
                "snow thickness",
                self.grid.len(),
                self.values.len(),
            ));
        }

        let bbox = self.grid.bbox();
        let width = plot.width.round().max(1.0) as usize;
        let height = plot.height.round().max(1.0) as usize;
        let pixels = rasterize_map(
            self.grid,
            self.values,
            self.colormap,
            &self.norm,
            &bbox,
            width,
            height,
        );
        canvas.blit_rgba(plot.x.round() as i64, plot.y.round() as i64, width, height, &pixels);

        self.draw_axes(canvas, fonts, plot, &bbox, metrics);
        self.draw_site(canvas, fonts, plot, &bbox, metrics);
        draw_colorbar(
            canvas,
            fonts,
            colorbar,
            self.colormap,
            &self.norm,
            self.colorbar_label,
            metrics,
        );

        canvas.text(
            fonts,
            self.title,
            plot.center().0,
            plot.y - metrics.title_px * 1.6,
            metrics.title_px,
            Color::BLACK,
            Align::Center,
        );
        Ok(())
    }

    fn draw_axes(
        &self,
        canvas: &mut Canvas,
        fonts: &TextRenderer,
        plot: PixelRect,
        bbox: &BoundingBox,
        metrics: &Metrics,
    ) {
        canvas.stroke_rect(plot, metrics.line_px, Color::BLACK);
        let font = metrics.font_px;

        let x_step = nice_step(bbox.min_x, bbox.max_x, MAP_TICKS);
        for tick in nice_ticks(bbox.min_x, bbox.max_x, MAP_TICKS) {
            let (px, _) = data_to_pixel(plot, bbox, tick, bbox.min_y);
            let tick_end = (px, plot.bottom() + metrics.tick_px);
            canvas.line((px, plot.bottom()), tick_end, metrics.line_px, Color::BLACK);
            canvas.text(
                fonts,
                &format_tick(tick, x_step),
                px,
                plot.bottom() + metrics.tick_px * 1.5,
                font,
                Color::BLACK,
                Align::Center,
            );
        }

        let y_step = nice_step(bbox.min_y, bbox.max_y, MAP_TICKS);
        let mut widest = 0.0f32;
        for tick in nice_ticks(bbox.min_y, bbox.max_y, MAP_TICKS) {
            let (_, py) = data_to_pixel(plot, bbox, bbox.min_x, tick);
            let label = format_tick(tick, y_step);
            widest = widest.max(fonts.text_width(&label, font));
            let tick_start = (plot.x - metrics.tick_px, py);
            canvas.line(tick_start, (plot.x, py), metrics.line_px, Color::BLACK);
            canvas.text(
                fonts,
                &label,
                plot.x - metrics.tick_px * 1.5,
                py - font * 0.6,
                font,
                Color::BLACK,
                Align::Right,
            );
        }

        canvas.text(
            fonts,
            "x [m]",
            plot.center().0,
            plot.bottom() + metrics.tick_px * 1.5 + font * 1.4,
            font,
            Color::BLACK,
            Align::Center,
        );
        canvas.text_vertical(
            fonts,
            "y [m]",
            plot.x - metrics.tick_px * 1.5 - widest - font,
            plot.center().1,
            font,
            Color::BLACK,
        );
    }

    fn draw_site(
        &self,
        canvas: &mut Canvas,
        fonts: &TextRenderer,
        plot: PixelRect,
        bbox: &BoundingBox,
        metrics: &Metrics,
    ) {
        let marker = data_to_pixel(plot, bbox, self.site.x, self.site.y);
        if plot.contains(marker.0, marker.1) {
            canvas.fill_circle(marker, metrics.marker_px, Color::BLACK);
        }

        // label anchored at its baseline-left corner
        let (lx, ly) = data_to_pixel(plot, bbox, self.site.label_x, self.site.label_y);
        canvas.text(
            fonts,
            &self.site.name,
            lx,
            ly - metrics.font_px * 0.8,
            metrics.font_px,
            Color::BLACK,
            Align::Left,
        );
    }
}

/// Map projected coordinates to pixels; north is up.
fn data_to_pixel(plot: PixelRect, bbox: &BoundingBox, x: f64, y: f64) -> (f32, f32) {
    let (fx, fy) = bbox.normalize(x, y);
    (
        plot.x + (fx as f32) * plot.width,
        plot.bottom() - (fy as f32) * plot.height,
    )
}

/// Sample the grid at every output pixel (nearest cell) and colormap it.
///
/// Returns `width * height` RGBA pixels covering `bbox` with north up.
/// Pixels whose cell is NaN get the colormap's bad color.
pub fn rasterize_map(
    grid: &GridSpec,
    values: &[f32],
    colormap: &Colormap,
    norm: &Normalize,
    bbox: &BoundingBox,
    width: usize,
    height: usize,
) -> Vec<u8> {
    let mut pixels = vec![0u8; width * height * 4];
    if width == 0 || height == 0 {
        return pixels;
    }

    let dx = bbox.width() / width as f64;
    let dy = bbox.height() / height as f64;

    pixels
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(row, out)| {
            let y = bbox.max_y - (row as f64 + 0.5) * dy;
            for col in 0..width {
                let x = bbox.min_x + (col as f64 + 0.5) * dx;
                let value = grid
                    .coord_to_index(x, y)
                    .and_then(|(c, r)| values.get(grid.flat_index(c, r)).copied())
                    .unwrap_or(f32::NAN);
                let color = colormap.map_value(value, norm);
                let i = col * 4;
                out[i] = color.r;
                out[i + 1] = color.g;
                out[i + 2] = color.b;
                out[i + 3] = color.a;
            }
        });

    pixels
}

fn draw_colorbar(
    canvas: &mut Canvas,
    fonts: &TextRenderer,
    rect: PixelRect,
    colormap: &Colormap,
    norm: &Normalize,
    label: &str,
    metrics: &Metrics,
) {
    let rows = rect.height.round().max(1.0) as usize;
    for row in 0..rows {
        let t = 1.0 - (row as f32 + 0.5) / rows as f32;
        canvas.fill_rect(
            PixelRect::new(rect.x, rect.y + row as f32, rect.width, 1.0),
            colormap.map(t),
        );
    }
    canvas.stroke_rect(rect, metrics.line_px, Color::BLACK);

    let (vmin, vmax) = (norm.vmin as f64, norm.vmax as f64);
    let step = nice_step(vmin, vmax, COLORBAR_TICKS);
    let mut widest = 0.0f32;
    for tick in nice_ticks(vmin, vmax, COLORBAR_TICKS) {
        let frac = if vmax > vmin { ((tick - vmin) / (vmax - vmin)) as f32 } else { 0.0 };
        let py = rect.bottom() - frac * rect.height;
        let label = format_tick(tick, step);
        widest = widest.max(fonts.text_width(&label, metrics.font_px));
        let tick_end = (rect.right() + metrics.tick_px, py);
        canvas.line((rect.right(), py), tick_end, metrics.line_px, Color::BLACK);
        canvas.text(
            fonts,
            &label,
            rect.right() + metrics.tick_px * 1.5,
            py - metrics.font_px * 0.6,
            metrics.font_px,
            Color::BLACK,
            Align::Left,
        );
    }

    canvas.text_vertical(
        fonts,
        label,
        rect.right() + metrics.tick_px * 1.5 + widest + metrics.font_px,
        rect.center().1,
        metrics.font_px,
        Color::BLACK,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterize_map_north_up() {
        // 2x2 grid, y decreasing: top row holds 0.0, bottom row 3.5
        let grid = GridSpec::regular(2, 2, 0.5, 1.5, 1.0, -1.0);
        let values = [0.0, 0.0, 3.5, 3.5];
        let cmap = Colormap::blues_r();
        let norm = Normalize::new(0.0, 3.5);
        let pixels = rasterize_map(&grid, &values, &cmap, &norm, &grid.bbox(), 4, 4);

        let top = &pixels[0..4];
        let bottom = &pixels[(3 * 4) * 4..(3 * 4) * 4 + 4];
        assert_eq!(top, &[0x08, 0x30, 0x6b, 255]);
        assert_eq!(bottom, &[0xf7, 0xfb, 0xff, 255]);
    }

    #[test]
    fn test_rasterize_map_nan_is_transparent() {
        let grid = GridSpec::regular(1, 1, 0.0, 0.0, 1.0, 1.0);
        let pixels = rasterize_map(
            &grid,
            &[f32::NAN],
            &Colormap::blues_r(),
            &Normalize::new(0.0, 1.0),
            &grid.bbox(),
            2,
            2,
        );
        assert!(pixels.chunks(4).all(|p| p[3] == 0));
    }
}
