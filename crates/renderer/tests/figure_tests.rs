//! End-to-end tests for drawing and writing frame figures.

use chrono::{TimeZone, Utc};
use grid_processor::TerrainSurface;
use renderer::{write_jpeg, Figure, FigureStyle, FrameData, Layout, TextRenderer};
use snow_common::GridSpec;
use test_utils::{create_mountain_dem, create_snow_grid, sasp_grid};

const NX: usize = 40;
const NY: usize = 30;

fn small_figure() -> Figure {
    let style = FigureStyle {
        dpi: 20.0,
        surface_samples: 20,
        ..FigureStyle::default()
    };
    Figure::new(style, TextRenderer::stroke()).unwrap()
}

fn fixtures() -> (GridSpec, Vec<f32>, TerrainSurface) {
    let grid = sasp_grid(NX, NY, 100.0);
    let snow = create_snow_grid(NX, NY, 30);
    let terrain =
        TerrainSurface::from_elevation(grid.clone(), create_mountain_dem(NX, NY)).unwrap();
    (grid, snow, terrain)
}

fn frame<'a>(
    index: usize,
    grid: &'a GridSpec,
    snow: &'a [f32],
    terrain: &'a TerrainSurface,
) -> FrameData<'a> {
    FrameData {
        index,
        time: Utc.with_ymd_and_hms(2020, 1, 15, 22, 0, 0).unwrap(),
        grid,
        thickness: snow,
        terrain,
    }
}

#[test]
fn test_render_has_figure_size() {
    let (grid, snow, terrain) = fixtures();
    let img = small_figure().render(&frame(0, &grid, &snow, &terrain)).unwrap();
    assert_eq!(img.dimensions(), (220, 120));
}

#[test]
fn test_site_marker_is_black_on_map() {
    let (grid, snow, terrain) = fixtures();
    let img = small_figure().render(&frame(3, &grid, &snow, &terrain)).unwrap();

    // the fixture grid is centred on the site
    let layout = Layout::new(220.0, 120.0);
    let (cx, cy) = layout.map.center();
    let px = img.get_pixel(cx.round() as u32, cy.round() as u32);
    assert_eq!(px.0, [0, 0, 0]);
}

#[test]
fn test_nan_snow_leaves_map_background_white() {
    let (grid, _, terrain) = fixtures();
    let snow = vec![f32::NAN; NX * NY];
    let img = small_figure().render(&frame(0, &grid, &snow, &terrain)).unwrap();

    let layout = Layout::new(220.0, 120.0);
    let x = (layout.map.x + layout.map.width * 0.25) as u32;
    let y = (layout.map.y + layout.map.height * 0.75) as u32;
    assert_eq!(img.get_pixel(x, y).0, [255, 255, 255]);
}

#[test]
fn test_map_shows_colormapped_snow() {
    let (grid, _, terrain) = fixtures();
    // zero snow maps to the darkest blue
    let snow = vec![0.0; NX * NY];
    let img = small_figure().render(&frame(0, &grid, &snow, &terrain)).unwrap();

    let layout = Layout::new(220.0, 120.0);
    let x = (layout.map.x + layout.map.width * 0.25) as u32;
    let y = (layout.map.y + layout.map.height * 0.75) as u32;
    assert_eq!(img.get_pixel(x, y).0, [0x08, 0x30, 0x6b]);
}

#[test]
fn test_render_is_deterministic() {
    let (grid, snow, terrain) = fixtures();
    let figure = small_figure();
    let a = figure.render(&frame(5, &grid, &snow, &terrain)).unwrap();
    let b = figure.render(&frame(5, &grid, &snow, &terrain)).unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn test_surface_view_rotates_with_index() {
    let (grid, snow, terrain) = fixtures();
    let figure = small_figure();
    let a = figure.render(&frame(0, &grid, &snow, &terrain)).unwrap();
    let b = figure.render(&frame(90, &grid, &snow, &terrain)).unwrap();

    let layout = Layout::new(220.0, 120.0);
    let s = layout.surface;
    let differs = (s.y as u32..s.bottom() as u32).any(|y| {
        (s.x as u32..s.right() as u32).any(|x| a.get_pixel(x, y) != b.get_pixel(x, y))
    });
    assert!(differs);
}

#[test]
fn test_grid_mismatch_is_error() {
    let (_, _, terrain) = fixtures();
    let grid = sasp_grid(NX + 1, NY, 100.0);
    let snow = vec![1.0; (NX + 1) * NY];
    assert!(small_figure().render(&frame(0, &grid, &snow, &terrain)).is_err());
}

#[test]
fn test_short_thickness_is_error() {
    let (grid, _, terrain) = fixtures();
    let snow = vec![1.0; 10];
    assert!(small_figure().render(&frame(0, &grid, &snow, &terrain)).is_err());
}

#[test]
fn test_write_jpeg_replaces_file() {
    let (grid, snow, terrain) = fixtures();
    let img = small_figure().render(&frame(0, &grid, &snow, &terrain)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("20200115.jpg");
    std::fs::write(&path, b"stale").unwrap();
    write_jpeg(&path, &img, 90).unwrap();

    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (220, 120));
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["20200115.jpg".to_string()]);
}
