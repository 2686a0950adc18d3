//! Tests for colormaps and colormapped grid rendering.

use renderer::gradient::{interpolate_color, Color, Colormap, Normalize};
use renderer::style::ColorStop;
use renderer::RenderError;

// ============================================================================
// interpolate_color tests
// ============================================================================

#[test]
fn test_interpolate_color_midpoint() {
    let c = interpolate_color(Color::rgb(0, 0, 0), Color::rgb(255, 100, 50), 0.5);
    assert_eq!(c, Color::rgb(128, 50, 25));
}

#[test]
fn test_interpolate_color_clamps() {
    let a = Color::rgb(10, 20, 30);
    let b = Color::rgb(200, 210, 220);
    assert_eq!(interpolate_color(a, b, -1.0), a);
    assert_eq!(interpolate_color(a, b, 2.0), b);
}

// ============================================================================
// Colormap tests
// ============================================================================

#[test]
fn test_from_stops_sorts_and_rescales() {
    let stops = vec![
        ColorStop::new(10.0, "#ffffff"),
        ColorStop::new(0.0, "#000000"),
        ColorStop::new(5.0, "#ff0000"),
    ];
    let cmap = Colormap::from_stops(&stops).unwrap();

    assert_eq!(cmap.map(0.0), Color::rgb(0, 0, 0));
    assert_eq!(cmap.map(0.5), Color::rgb(255, 0, 0));
    assert_eq!(cmap.map(1.0), Color::rgb(255, 255, 255));
    assert_eq!(cmap.map(0.25), Color::rgb(128, 0, 0));
}

#[test]
fn test_from_stops_rejects_bad_input() {
    assert!(matches!(
        Colormap::from_stops(&[]),
        Err(RenderError::InvalidParameter(_))
    ));
    assert!(matches!(
        Colormap::from_stops(&[ColorStop::new(0.0, "blue")]),
        Err(RenderError::InvalidColor(_))
    ));
}

#[test]
fn test_single_stop_is_constant() {
    let cmap = Colormap::from_stops(&[ColorStop::new(3.0, "#123456")]).unwrap();
    assert_eq!(cmap.map(0.0), Color::rgb(0x12, 0x34, 0x56));
    assert_eq!(cmap.map(1.0), Color::rgb(0x12, 0x34, 0x56));
}

#[test]
fn test_blues_r_is_blues_reversed() {
    let blues = Colormap::blues();
    let blues_r = Colormap::blues_r();
    for t in [0.0f32, 0.1, 0.33, 0.5, 0.8, 1.0] {
        let a = blues.map(t);
        let b = blues_r.map(1.0 - t);
        for (x, y) in [(a.r, b.r), (a.g, b.g), (a.b, b.b)] {
            assert!((x as i32 - y as i32).abs() <= 1, "t={} {:?} vs {:?}", t, a, b);
        }
    }
}

#[test]
fn test_blues_r_darkens_towards_zero() {
    let cmap = Colormap::blues_r();
    let brightness = |c: Color| c.r as u32 + c.g as u32 + c.b as u32;
    let mut last = 0;
    for i in 0..=10 {
        let b = brightness(cmap.map(i as f32 / 10.0));
        assert!(b >= last);
        last = b;
    }
}

#[test]
fn test_named_colormaps() {
    assert_eq!(Colormap::named("Blues_r"), Some(Colormap::blues_r()));
    assert!(Colormap::named("Greys").is_some());
    assert!(Colormap::named("nope").is_none());
}

#[test]
fn test_bad_color_override() {
    let cmap = Colormap::blues_r().with_bad(Color::rgb(255, 0, 255));
    assert_eq!(cmap.map(f32::NAN), Color::rgb(255, 0, 255));
}

#[test]
fn test_map_value_clips_to_range() {
    let cmap = Colormap::blues_r();
    let norm = Normalize::new(0.0, 3.5);

    assert_eq!(cmap.map_value(-1.0, &norm), cmap.map_value(0.0, &norm));
    assert_eq!(cmap.map_value(10.0, &norm), Color::rgb(0xf7, 0xfb, 0xff));
    assert!(cmap.map_value(f32::NAN, &norm).is_transparent());
}
