//! 3D shaded surface panel.
//!
//! The terrain is sampled on a strided grid, projected orthographically for
//! the requested view and rasterized as two triangles per quad with a depth
//! buffer. Each quad takes its color from the snow thickness at its first
//! corner and is darkened by how directly it faces the light source.

use grid_processor::{sample_grid, stride_indices, TerrainSurface};
use snow_common::Site;

use crate::canvas::{Align, Canvas, PixelRect};
use crate::error::{RenderError, RenderResult};
use crate::figure::Metrics;
use crate::font::TextRenderer;
use crate::gradient::{Color, Colormap, Normalize};

type Vec3 = [f64; 3];

/// Pane fill and edge colors behind the surface.
const PANE_COLOR: Color = Color::rgb(242, 242, 242);
const PANE_EDGE: Color = Color::rgb(190, 190, 190);

/// Barycentric slack so adjacent triangles leave no seams.
const EDGE_EPS: f64 = -1e-4;

/// Directional light used to shade surface quads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            azimuth_deg: 225.0,
            altitude_deg: 19.4712,
        }
    }
}

impl LightSource {
    /// Unit vector pointing towards the light; azimuth is clockwise from north.
    pub fn direction(&self) -> Vec3 {
        let az = (90.0 - self.azimuth_deg).to_radians();
        let alt = self.altitude_deg.to_radians();
        [az.cos() * alt.cos(), az.sin() * alt.cos(), alt.sin()]
    }

    /// Brightness factor in `0.3..=1.0` for a surface normal.
    ///
    /// A zero-length normal gets the mid-range factor.
    pub fn shade_factor(&self, normal: Vec3) -> f32 {
        let len = norm(normal);
        let cos = if len > 0.0 {
            dot(normal, self.direction()) / len
        } else {
            0.0
        };
        (0.3 + 0.7 * (cos + 1.0) / 2.0) as f32
    }
}

/// Camera angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

impl View {
    pub fn new(elevation_deg: f64, azimuth_deg: f64) -> Self {
        Self {
            elevation_deg,
            azimuth_deg,
        }
    }

    /// Screen-right, screen-up and towards-viewer unit vectors.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let (se, ce) = self.elevation_deg.to_radians().sin_cos();
        let (sa, ca) = self.azimuth_deg.to_radians().sin_cos();
        let right = [-sa, ca, 0.0];
        let up = [-se * ca, -se * sa, ce];
        let eye = [ce * ca, ce * sa, se];
        (right, up, eye)
    }
}

/// Counts reported after drawing a surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    pub quads_drawn: usize,
    pub quads_skipped: usize,
}

/// Inputs for one surface panel.
pub struct SurfacePanel<'a> {
    pub terrain: &'a TerrainSurface,
    /// Values colouring each quad, on the terrain grid.
    pub colors: &'a [f32],
    pub colormap: &'a Colormap,
    pub norm: Normalize,
    pub site: &'a Site,
    pub view: View,
    pub light: LightSource,
    /// Upper bound on sampled rows and columns.
    pub max_samples: usize,
    /// Relative lengths of the x, y and z box edges.
    pub box_aspect: [f64; 3],
}

impl SurfacePanel<'_> {
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        fonts: &TextRenderer,
        rect: PixelRect,
        metrics: &Metrics,
    ) -> RenderResult<SurfaceStats> {
        let grid = &self.terrain.grid;
        if self.colors.len() != grid.len() {
            return Err(RenderError::shape_mismatch(
                "surface colors",
                grid.len(),
                self.colors.len(),
            ));
        }
        if grid.is_empty() {
            return Ok(SurfaceStats::default());
        }

        let projector = Projector::new(self, rect);
        projector.draw_panes(canvas, metrics);

        let rows = stride_indices(grid.ny(), self.max_samples);
        let cols = stride_indices(grid.nx(), self.max_samples);
        let elevation = sample_grid(&self.terrain.elevation, grid.nx(), &rows, &cols);
        let thickness = sample_grid(self.colors, grid.nx(), &rows, &cols);
        let n = cols.len();
        let point = |i: usize, j: usize| -> Vec3 {
            [grid.x[cols[j]], grid.y[rows[i]], elevation[i * n + j] as f64]
        };

        let mut zbuf = DepthBuffer::new(rect);
        let mut stats = SurfaceStats::default();

        for i in 0..rows.len().saturating_sub(1) {
            for j in 0..n.saturating_sub(1) {
                let color = self.colormap.map_value(thickness[i * n + j], &self.norm);
                let corners =
                    [(i, j), (i, j + 1), (i + 1, j + 1), (i + 1, j)].map(|(i, j)| point(i, j));

                let has_gap = corners.iter().any(|p| p.iter().any(|v| !v.is_finite()));
                if color.is_transparent() || has_gap {
                    stats.quads_skipped += 1;
                    continue;
                }

                let shaded = color.shade(self.light.shade_factor(quad_normal(&corners)));
                let screen = corners.map(|p| projector.project(p));
                zbuf.triangle(canvas, [screen[0], screen[1], screen[2]], shaded);
                zbuf.triangle(canvas, [screen[0], screen[2], screen[3]], shaded);
                stats.quads_drawn += 1;
            }
        }

        self.draw_site(canvas, fonts, &projector, metrics);
        Ok(stats)
    }

    fn draw_site(
        &self,
        canvas: &mut Canvas,
        fonts: &TextRenderer,
        projector: &Projector,
        metrics: &Metrics,
    ) {
        let site = self.site;
        for (z0, z1) in [site.upper_stem, site.lower_stem] {
            let a = projector.project([site.x, site.y, z0]);
            let b = projector.project([site.x, site.y, z1]);
            canvas.line((a.0, a.1), (b.0, b.1), metrics.stem_px, Color::BLACK);
        }
        let label = projector.project([site.x, site.y, site.label_z]);
        canvas.text(
            fonts,
            &site.name,
            label.0,
            label.1 - metrics.font_px * 0.8,
            metrics.font_px,
            Color::BLACK,
            Align::Left,
        );
    }
}

/// Data-to-screen transform for one panel.
struct Projector {
    lo: Vec3,
    hi: Vec3,
    half_box: Vec3,
    right: Vec3,
    up: Vec3,
    eye: Vec3,
    center: (f32, f32),
    scale: f64,
}

impl Projector {
    fn new(panel: &SurfacePanel<'_>, rect: PixelRect) -> Self {
        let grid = &panel.terrain.grid;
        let site = panel.site;
        let span = |v: &[f64]| {
            v.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| (lo.min(c), hi.max(c)))
        };
        let (mut x_lo, mut x_hi) = span(&grid.x);
        let (mut y_lo, mut y_hi) = span(&grid.y);
        x_lo = x_lo.min(site.x);
        x_hi = x_hi.max(site.x);
        y_lo = y_lo.min(site.y);
        y_hi = y_hi.max(site.y);

        let stems = [site.lower_stem.0, site.lower_stem.1, site.upper_stem.0, site.upper_stem.1];
        let z_lo = stems.iter().fold(panel.terrain.min as f64, |a, &b| a.min(b));
        let z_hi = stems.iter().fold(panel.terrain.max as f64, |a, &b| a.max(b));

        let max_aspect = panel
            .box_aspect
            .iter()
            .cloned()
            .fold(f64::MIN, f64::max)
            .max(f64::EPSILON);
        let half_box = panel.box_aspect.map(|a| a / max_aspect / 2.0);
        let radius = norm(half_box).max(f64::EPSILON);
        let (right, up, eye) = panel.view.basis();

        Self {
            lo: [x_lo, y_lo, z_lo],
            hi: [x_hi, y_hi, z_hi],
            half_box,
            right,
            up,
            eye,
            center: rect.center(),
            scale: rect.width.min(rect.height) as f64 / (2.0 * radius),
        }
    }

    /// Position inside the unit-aspect box centred on the origin.
    fn to_box(&self, p: Vec3) -> Vec3 {
        let mut out = [0.0; 3];
        for i in 0..3 {
            let range = self.hi[i] - self.lo[i];
            out[i] = if range > 0.0 {
                ((p[i] - self.lo[i]) / range - 0.5) * 2.0 * self.half_box[i]
            } else {
                0.0
            };
        }
        out
    }

    /// Pixel position and depth (larger is nearer the viewer).
    fn project(&self, p: Vec3) -> (f32, f32, f32) {
        let b = self.to_box(p);
        let sx = dot(b, self.right) * self.scale;
        let sy = dot(b, self.up) * self.scale;
        (
            self.center.0 + sx as f32,
            self.center.1 - sy as f32,
            dot(b, self.eye) as f32,
        )
    }

    /// Fill the floor and the two walls facing away from the viewer.
    fn draw_panes(&self, canvas: &mut Canvas, metrics: &Metrics) {
        let [x0, y0, z0] = self.lo;
        let [x1, y1, z1] = self.hi;
        let back_x = if self.eye[0] > 0.0 { x0 } else { x1 };
        let back_y = if self.eye[1] > 0.0 { y0 } else { y1 };
        let floor = if self.eye[2] > 0.0 { z0 } else { z1 };

        let panes: [[Vec3; 4]; 3] = [
            [[x0, y0, floor], [x1, y0, floor], [x1, y1, floor], [x0, y1, floor]],
            [[back_x, y0, z0], [back_x, y1, z0], [back_x, y1, z1], [back_x, y0, z1]],
            [[x0, back_y, z0], [x1, back_y, z0], [x1, back_y, z1], [x0, back_y, z1]],
        ];
        for pane in &panes {
            let pts: Vec<(f32, f32)> = pane
                .iter()
                .map(|&p| {
                    let (x, y, _) = self.project(p);
                    (x, y)
                })
                .collect();
            canvas.fill_polygon(&pts, PANE_COLOR);
            for i in 0..4 {
                canvas.line(pts[i], pts[(i + 1) % 4], metrics.line_px, PANE_EDGE);
            }
        }
    }
}

/// Per-pixel depth for one panel rectangle.
struct DepthBuffer {
    x0: i64,
    y0: i64,
    width: i64,
    height: i64,
    depth: Vec<f32>,
}

impl DepthBuffer {
    fn new(rect: PixelRect) -> Self {
        let width = rect.width.round().max(0.0) as i64;
        let height = rect.height.round().max(0.0) as i64;
        Self {
            x0: rect.x.round() as i64,
            y0: rect.y.round() as i64,
            width,
            height,
            depth: vec![f32::NEG_INFINITY; (width * height) as usize],
        }
    }

    fn triangle(&mut self, canvas: &mut Canvas, v: [(f32, f32, f32); 3], color: Color) {
        let area = edge(v[0], v[1], (v[2].0 as f64, v[2].1 as f64));
        if area.abs() < 1e-12 {
            return;
        }

        let min_x = v.iter().map(|p| p.0).fold(f32::INFINITY, f32::min).floor() as i64;
        let max_x = v.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max).ceil() as i64;
        let min_y = v.iter().map(|p| p.1).fold(f32::INFINITY, f32::min).floor() as i64;
        let max_y = v.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max).ceil() as i64;

        let x_start = min_x.max(self.x0);
        let x_end = max_x.min(self.x0 + self.width - 1);
        let y_start = min_y.max(self.y0);
        let y_end = max_y.min(self.y0 + self.height - 1);

        for py in y_start..=y_end {
            for px in x_start..=x_end {
                let p = (px as f64 + 0.5, py as f64 + 0.5);
                let w0 = edge(v[1], v[2], p) / area;
                let w1 = edge(v[2], v[0], p) / area;
                let w2 = 1.0 - w0 - w1;
                if w0 < EDGE_EPS || w1 < EDGE_EPS || w2 < EDGE_EPS {
                    continue;
                }

                let z = (w0 * v[0].2 as f64 + w1 * v[1].2 as f64 + w2 * v[2].2 as f64) as f32;
                let idx = ((py - self.y0) * self.width + (px - self.x0)) as usize;
                if z > self.depth[idx] {
                    self.depth[idx] = z;
                    canvas.blend_pixel(px, py, color);
                }
            }
        }
    }
}

fn edge(a: (f32, f32, f32), b: (f32, f32, f32), p: (f64, f64)) -> f64 {
    let (ax, ay) = (a.0 as f64, a.1 as f64);
    let (bx, by) = (b.0 as f64, b.1 as f64);
    (bx - ax) * (p.1 - ay) - (by - ay) * (p.0 - ax)
}

/// Upward-facing normal of a quad from its diagonals.
fn quad_normal(c: &[Vec3; 4]) -> Vec3 {
    let d1 = sub(c[2], c[0]);
    let d2 = sub(c[3], c[1]);
    let n = cross(d1, d2);
    if n[2] < 0.0 {
        [-n[0], -n[1], -n[2]]
    } else {
        n
    }
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_direction_is_unit() {
        let d = LightSource::default().direction();
        assert!((norm(d) - 1.0).abs() < 1e-12);
        // azimuth 225 points south-west
        assert!(d[0] < 0.0 && d[1] < 0.0 && d[2] > 0.0);
    }

    #[test]
    fn test_shade_factor_range() {
        let light = LightSource::default();
        let facing = light.shade_factor(light.direction());
        let away = light.shade_factor(light.direction().map(|v| -v));
        assert!((facing - 1.0).abs() < 1e-6);
        assert!((away - 0.3).abs() < 1e-6);
        assert!((light.shade_factor([0.0, 0.0, 0.0]) - 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_view_basis_orthonormal() {
        let (r, u, e) = View::new(60.0, 37.0).basis();
        for v in [r, u, e] {
            assert!((norm(v) - 1.0).abs() < 1e-12);
        }
        assert!(dot(r, u).abs() < 1e-12);
        assert!(dot(r, e).abs() < 1e-12);
        assert!(dot(u, e).abs() < 1e-12);
    }

    #[test]
    fn test_quad_normal_points_up() {
        // north-up row order flips the winding
        let quad = [
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
        ];
        let n = quad_normal(&quad);
        assert!(n[2] > 0.0);
        assert_eq!(n[0], 0.0);
        assert_eq!(n[1], 0.0);
    }

    #[test]
    fn test_draw_uses_strided_samples() {
        // 10 x 8 cells at most 4 samples: columns 0,3,6,9 and rows 0,2,4,6,7
        let grid = snow_common::GridSpec::regular(10, 8, 260000.0, 4199000.0, 50.0, -50.0);
        let elevation = (0..80).map(|i| 3000.0 + i as f32).collect();
        let terrain = TerrainSurface::from_elevation(grid, elevation).unwrap();
        let mut colors = vec![1.0f32; 80];
        // first corner of the first quad
        colors[0] = f32::NAN;
        // not a sampled cell
        colors[1] = f32::NAN;

        let cmap = Colormap::blues_r();
        let site = Site::sasp();
        let panel = SurfacePanel {
            terrain: &terrain,
            colors: &colors,
            colormap: &cmap,
            norm: Normalize::new(0.0, 3.0),
            site: &site,
            view: View::new(60.0, 0.0),
            light: LightSource::default(),
            max_samples: 4,
            box_aspect: [4.0, 4.0, 3.0],
        };

        let mut canvas = Canvas::new(120, 100, Color::WHITE);
        let stats = panel
            .draw(
                &mut canvas,
                &TextRenderer::stroke(),
                PixelRect::new(10.0, 10.0, 100.0, 80.0),
                &Metrics::for_dpi(20.0),
            )
            .unwrap();

        assert_eq!(stats.quads_drawn + stats.quads_skipped, 4 * 3);
        assert_eq!(stats.quads_skipped, 1);
    }

    #[test]
    fn test_draw_rejects_color_length_mismatch() {
        let grid = snow_common::GridSpec::regular(3, 3, 0.0, 0.0, 1.0, 1.0);
        let terrain = TerrainSurface::from_elevation(grid, vec![0.0; 9]).unwrap();
        let cmap = Colormap::blues_r();
        let site = Site::sasp();
        let panel = SurfacePanel {
            terrain: &terrain,
            colors: &[0.0; 4],
            colormap: &cmap,
            norm: Normalize::new(0.0, 3.0),
            site: &site,
            view: View::new(60.0, 0.0),
            light: LightSource::default(),
            max_samples: 600,
            box_aspect: [4.0, 4.0, 3.0],
        };
        let mut canvas = Canvas::new(20, 20, Color::WHITE);
        let result = panel.draw(
            &mut canvas,
            &TextRenderer::stroke(),
            PixelRect::new(0.0, 0.0, 20.0, 20.0),
            &Metrics::for_dpi(20.0),
        );
        assert!(result.is_err());
    }
}
