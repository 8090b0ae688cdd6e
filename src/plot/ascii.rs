//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - historical series: `-` line
//! - forecast points: `*`

use crate::domain::{ForecastFile, ForecastPoint, RatePoint};

/// Render a plot for an in-memory run (history + forecast).
pub fn render_ascii_plot(
    history: &[RatePoint],
    forecast: &[ForecastPoint],
    width: usize,
    height: usize,
) -> String {
    let Some(first) = history.first() else {
        return "Plot: no data\n".to_string();
    };

    let day = |date: chrono::NaiveDate| (date - first.date).num_days() as f64;
    let history_xy: Vec<(f64, f64)> = history.iter().map(|p| (day(p.date), p.rate)).collect();
    let forecast_xy: Vec<(f64, f64)> = forecast.iter().map(|p| (day(p.date), p.rate)).collect();

    render_plot(&history_xy, &forecast_xy, width, height)
}

/// Render a plot from a saved forecast JSON file.
pub fn render_ascii_plot_from_forecast_file(
    file: &ForecastFile,
    width: usize,
    height: usize,
) -> String {
    render_ascii_plot(&file.history, &file.forecast, width, height)
}

fn render_plot(
    history: &[(f64, f64)],
    forecast: &[(f64, f64)],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(history, forecast).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(history, forecast).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    draw_curve(&mut grid, history, x_min, x_max, y_min, y_max);

    for &(x, y) in forecast {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = '*';
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: day=[{x_min:.0}, {x_max:.0}] | rate=[{y_min:.4}, {y_max:.4}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn x_range(history: &[(f64, f64)], forecast: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in history.iter().chain(forecast) {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(history: &[(f64, f64)], forecast: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in history.iter().chain(forecast) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.is_empty() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn plot_golden_snapshot_small() {
        let d = |day: u32| NaiveDate::from_ymd_opt(2026, 8, day).unwrap();
        let history = vec![
            RatePoint { date: d(1), rate: 1.00 },
            RatePoint { date: d(2), rate: 1.00 },
            RatePoint { date: d(3), rate: 1.00 },
        ];
        let forecast = vec![
            ForecastPoint { date: d(4), rate: 1.10 },
            ForecastPoint { date: d(5), rate: 1.10 },
        ];

        let txt = render_ascii_plot(&history, &forecast, 10, 5);
        let expected = concat!(
            "Plot: day=[0, 4] | rate=[0.9950, 1.1050]\n",
            "       * *\n",
            "          \n",
            "          \n",
            "          \n",
            "------    \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_history_renders_a_hint() {
        let txt = render_ascii_plot(&[], &[], 10, 5);
        assert!(txt.contains("no data"));
    }
}
