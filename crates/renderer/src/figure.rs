//! Two-panel frame figure: map view on the left, surface view on the right.

use chrono::{DateTime, Utc};
use grid_processor::TerrainSurface;
use image::RgbImage;
use snow_common::{GridSpec, Site};
use tracing::debug;

use crate::canvas::{Canvas, PixelRect};
use crate::error::{RenderError, RenderResult};
use crate::font::TextRenderer;
use crate::gradient::{Color, Colormap, Normalize};
use crate::map::MapPanel;
use crate::surface::{LightSource, SurfacePanel, View};

/// Subplot margins as fractions of the figure.
const LEFT: f32 = 0.125;
const RIGHT: f32 = 0.9;
const BOTTOM: f32 = 0.11;
const TOP: f32 = 0.88;
const WSPACE: f32 = 0.2;

/// Colorbar geometry relative to the map axes.
const CBAR_FRACTION: f32 = 0.15;
const CBAR_PAD: f32 = 0.05;
const CBAR_ASPECT: f32 = 20.0;

/// Pixel sizes derived from the output resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub font_px: f32,
    pub title_px: f32,
    pub line_px: f32,
    pub tick_px: f32,
    pub marker_px: f32,
    pub stem_px: f32,
}

impl Metrics {
    pub fn for_dpi(dpi: f32) -> Self {
        let pt = dpi / 72.0;
        Self {
            font_px: 10.0 * pt,
            title_px: 12.0 * pt,
            line_px: 0.8 * pt,
            tick_px: 3.5 * pt,
            marker_px: 20f32.sqrt() / 2.0 * pt,
            stem_px: 1.5 * pt,
        }
    }
}

/// Appearance of every frame.
#[derive(Debug, Clone)]
pub struct FigureStyle {
    pub width_in: f32,
    pub height_in: f32,
    pub dpi: f32,
    pub map_colormap: Colormap,
    pub map_norm: Normalize,
    pub surface_colormap: Colormap,
    pub surface_norm: Normalize,
    pub colorbar_label: String,
    pub view_elevation: f64,
    pub light: LightSource,
    pub surface_samples: usize,
    pub box_aspect: [f64; 3],
    pub site: Site,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            width_in: 11.0,
            height_in: 6.0,
            dpi: 300.0,
            map_colormap: Colormap::blues_r(),
            map_norm: Normalize::new(0.0, 3.5),
            surface_colormap: Colormap::blues_r(),
            surface_norm: Normalize::new(0.0, 3.0),
            colorbar_label: "Snow Height (m)".to_string(),
            view_elevation: 60.0,
            light: LightSource::default(),
            surface_samples: 600,
            box_aspect: [4.0, 4.0, 3.0],
            site: Site::sasp(),
        }
    }
}

impl FigureStyle {
    /// Output size in pixels.
    pub fn size_px(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round() as u32,
            (self.height_in * self.dpi).round() as u32,
        )
    }

    pub fn validate(&self) -> RenderResult<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.width_in) || !positive(self.height_in) || !positive(self.dpi) {
            return Err(RenderError::invalid_parameter(format!(
                "figure size {}x{} in at {} dpi must be positive",
                self.width_in, self.height_in, self.dpi
            )));
        }
        let (w, h) = self.size_px();
        if w < 16 || h < 16 {
            return Err(RenderError::invalid_parameter(format!(
                "figure of {}x{} px is too small",
                w, h
            )));
        }
        for (name, norm) in [("map", self.map_norm), ("surface", self.surface_norm)] {
            if !norm.vmin.is_finite() || !norm.vmax.is_finite() || norm.vmax <= norm.vmin {
                return Err(RenderError::invalid_parameter(format!(
                    "{} color range {}..{} is invalid",
                    name, norm.vmin, norm.vmax
                )));
            }
        }
        if self.surface_samples == 0 {
            return Err(RenderError::invalid_parameter("surface_samples must be at least 1"));
        }
        if self.box_aspect.iter().any(|a| !a.is_finite() || *a <= 0.0) {
            return Err(RenderError::invalid_parameter("box aspect must be positive"));
        }
        Ok(())
    }
}

/// One time step's worth of input.
#[derive(Debug, Clone, Copy)]
pub struct FrameData<'a> {
    /// Position in the time series; also the surface view azimuth in degrees.
    pub index: usize,
    pub time: DateTime<Utc>,
    pub grid: &'a GridSpec,
    pub thickness: &'a [f32],
    pub terrain: &'a TerrainSurface,
}

/// Reusable frame renderer.
#[derive(Debug)]
pub struct Figure {
    style: FigureStyle,
    fonts: TextRenderer,
    metrics: Metrics,
}

impl Figure {
    pub fn new(style: FigureStyle, fonts: TextRenderer) -> RenderResult<Self> {
        style.validate()?;
        let metrics = Metrics::for_dpi(style.dpi);
        Ok(Self {
            style,
            fonts,
            metrics,
        })
    }

    pub fn style(&self) -> &FigureStyle {
        &self.style
    }

    /// Draw both panels for one frame.
    pub fn render(&self, frame: &FrameData<'_>) -> RenderResult<RgbImage> {
        if !frame.grid.same_shape(&frame.terrain.grid) {
            return Err(RenderError::invalid_parameter(format!(
                "snow grid {} does not match terrain grid {}",
                frame.grid.shape_string(),
                frame.terrain.grid.shape_string()
            )));
        }

        let (width, height) = self.style.size_px();
        let mut canvas = Canvas::new(width, height, Color::WHITE);
        let layout = Layout::new(width as f32, height as f32);

        let title = format!("time = {}", frame.time.format("%Y-%m-%dT%H:%M:%S"));
        MapPanel {
            grid: frame.grid,
            values: frame.thickness,
            colormap: &self.style.map_colormap,
            norm: self.style.map_norm,
            site: &self.style.site,
            title: &title,
            colorbar_label: &self.style.colorbar_label,
        }
        .draw(&mut canvas, &self.fonts, layout.map, layout.colorbar, &self.metrics)?;

        let stats = SurfacePanel {
            terrain: frame.terrain,
            colors: frame.thickness,
            colormap: &self.style.surface_colormap,
            norm: self.style.surface_norm,
            site: &self.style.site,
            view: View::new(self.style.view_elevation, frame.index as f64),
            light: self.style.light,
            max_samples: self.style.surface_samples,
            box_aspect: self.style.box_aspect,
        }
        .draw(&mut canvas, &self.fonts, layout.surface, &self.metrics)?;

        debug!(
            index = frame.index,
            quads = stats.quads_drawn,
            skipped = stats.quads_skipped,
            "Rendered figure"
        );
        Ok(canvas.into_rgb())
    }
}

/// Panel rectangles for a figure of a given pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub map: PixelRect,
    pub colorbar: PixelRect,
    pub surface: PixelRect,
}

impl Layout {
    pub fn new(width: f32, height: f32) -> Self {
        let axes_w = (RIGHT - LEFT) / (2.0 + WSPACE) * width;
        let top = (1.0 - TOP) * height;
        let axes_h = (TOP - BOTTOM) * height;
        let left = LEFT * width;

        let map = PixelRect::new(left, top, axes_w * (1.0 - CBAR_FRACTION - CBAR_PAD), axes_h);
        let cbar_w = (axes_h / CBAR_ASPECT).min(axes_w * CBAR_FRACTION);
        let colorbar = PixelRect::new(left + axes_w * (1.0 - CBAR_FRACTION), top, cbar_w, axes_h);
        let surface = PixelRect::new(left + axes_w * (1.0 + WSPACE), top, axes_w, axes_h);

        Self {
            map,
            colorbar,
            surface,
        }
    }
}
