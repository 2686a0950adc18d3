//! Grids and time axes shaped like the snow model runs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use snow_common::{GridSpec, Site};

/// A north-up grid of `nx` x `ny` cells, `spacing` meters apart, centred on
/// the SASP site. Rows run north to south as in the model output.
pub fn sasp_grid(nx: usize, ny: usize, spacing: f64) -> GridSpec {
    let site = Site::sasp();
    let first_x = site.x - spacing * (nx as f64 - 1.0) / 2.0;
    let first_y = site.y + spacing * (ny as f64 - 1.0) / 2.0;
    GridSpec::regular(nx, ny, first_x, first_y, spacing, -spacing)
}

/// `count` timestamps one day apart, the first at `hour`:00 UTC on the given
/// date.
pub fn daily_times(year: i32, month: u32, day: u32, hour: u32, count: usize) -> Vec<DateTime<Utc>> {
    let first = Utc
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("fixture date must be valid");
    (0..count as i64).map(|d| first + Duration::days(d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sasp_grid_centred_on_site() {
        let site = Site::sasp();
        let grid = sasp_grid(21, 11, 50.0);
        assert!(grid.bbox().contains(site.x, site.y));
        assert_eq!(grid.coord_to_index(site.x, site.y), Some((10, 5)));
        assert!(grid.dy() < 0.0);
    }

    #[test]
    fn test_daily_times_cross_month_end() {
        let times = daily_times(2020, 2, 28, 22, 3);
        assert_eq!(times.len(), 3);
        assert_eq!(times[2].format("%Y%m%d %H").to_string(), "20200301 22");
    }
}
