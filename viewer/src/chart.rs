use crate::model::TrendPoint;
use chrono::DateTime;

/// Bucket width assumed when the server does not report one.
pub const DEFAULT_BUCKET_SECONDS: u32 = 300;

const RESET: &str = "\x1b[0m";

/// One plottable sample, timestamp in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub t_ms: i64,
    pub v: f64,
}

/// Parses wire pairs into plottable points: unparsable timestamps and
/// non-finite values are dropped, the rest sorted ascending by time.
pub fn prepare_points(raw: &[TrendPoint]) -> Vec<Point> {
    let mut points: Vec<Point> = raw
        .iter()
        .filter_map(|p| {
            let t_ms = DateTime::parse_from_rfc3339(&p.t).ok()?.timestamp_millis();
            p.v.is_finite().then_some(Point { t_ms, v: p.v })
        })
        .collect();

    points.sort_by_key(|p| p.t_ms);
    points
}

/// Gap threshold: twice the bucket width, so a single missed bucket still
/// joins but a dropout breaks the line.
pub fn gap_threshold_ms(bucket_seconds: Option<u32>) -> i64 {
    i64::from(bucket_seconds.unwrap_or(DEFAULT_BUCKET_SECONDS)) * 2 * 1000
}

/// Splits a prepared series wherever consecutive points are further apart
/// than `gap_ms`.
pub fn split_segments(points: &[Point], gap_ms: i64) -> Vec<Vec<Point>> {
    let mut segments = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for &point in points {
        if let Some(last) = current.last() {
            if point.t_ms - last.t_ms > gap_ms {
                segments.push(std::mem::take(&mut current));
            }
        }
        current.push(point);
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

#[derive(Debug, Clone, Copy)]
pub struct ChartConfig {
    pub width: usize,
    pub height: usize,
    /// Daily ranges label the x axis with `dd.mm`, the 24h range with `HH:MM`.
    pub daily_ticks: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 72,
            height: 10,
            daily_ticks: false,
        }
    }
}

/// Renders gap-segmented series as a fixed-size character grid with y-axis
/// value labels and x-axis time ticks. `color` is an ANSI 256-color index.
pub fn render(title: &str, unit: &str, color: u8, segments: &[Vec<Point>], cfg: ChartConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} [{}]\n", title, unit));

    let all: Vec<Point> = segments.iter().flatten().copied().collect();
    if all.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let t_min = all.iter().map(|p| p.t_ms).min().unwrap_or(0);
    let t_max = all.iter().map(|p| p.t_ms).max().unwrap_or(0);
    let mut v_min = all.iter().map(|p| p.v).fold(f64::INFINITY, f64::min);
    let mut v_max = all.iter().map(|p| p.v).fold(f64::NEG_INFINITY, f64::max);

    // Pad a flat series so it does not collapse onto one row.
    if (v_max - v_min).abs() < f64::EPSILON {
        v_min -= 1.0;
        v_max += 1.0;
    }

    let t_span = (t_max - t_min).max(1);
    let v_span = v_max - v_min;
    let col_of = |t_ms: i64| -> usize {
        (((t_ms - t_min) as f64 / t_span as f64) * (cfg.width - 1) as f64).round() as usize
    };
    let row_of = |v: f64| -> usize {
        let norm = (v - v_min) / v_span;
        ((1.0 - norm) * (cfg.height - 1) as f64).round() as usize
    };

    let mut grid = vec![vec![false; cfg.width]; cfg.height];
    for segment in segments {
        plot_segment(&mut grid, segment, &col_of, &row_of);
    }

    let label_width = 9;
    for (row, cells) in grid.iter().enumerate() {
        let label = if row == 0 {
            format!("{:>8.1} ", v_max)
        } else if row == cfg.height - 1 {
            format!("{:>8.1} ", v_min)
        } else {
            " ".repeat(label_width)
        };

        out.push_str(&label);
        out.push('│');
        out.push_str(&format!("\x1b[38;5;{}m", color));
        for &filled in cells {
            out.push(if filled { '•' } else { ' ' });
        }
        out.push_str(RESET);
        out.push('\n');
    }

    out.push_str(&" ".repeat(label_width));
    out.push('└');
    out.push_str(&"─".repeat(cfg.width));
    out.push('\n');
    out.push_str(&x_axis_labels(t_min, t_max, cfg, label_width + 1));

    out
}

fn plot_segment(
    grid: &mut [Vec<bool>],
    segment: &[Point],
    col_of: &dyn Fn(i64) -> usize,
    row_of: &dyn Fn(f64) -> usize,
) {
    if segment.is_empty() {
        return;
    }

    if segment.len() == 1 {
        grid[row_of(segment[0].v)][col_of(segment[0].t_ms)] = true;
        return;
    }

    for pair in segment.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (col_a, col_b) = (col_of(a.t_ms), col_of(b.t_ms));

        if col_a == col_b {
            grid[row_of(a.v)][col_a] = true;
            grid[row_of(b.v)][col_b] = true;
            continue;
        }

        // Linear interpolation across the columns between the two samples.
        for col in col_a..=col_b {
            let frac = (col - col_a) as f64 / (col_b - col_a) as f64;
            let v = a.v + (b.v - a.v) * frac;
            grid[row_of(v)][col] = true;
        }
    }
}

fn x_axis_labels(t_min: i64, t_max: i64, cfg: ChartConfig, indent: usize) -> String {
    let format = if cfg.daily_ticks { "%d.%m" } else { "%H:%M" };
    let tick_at = |frac: f64| -> String {
        let t_ms = t_min + ((t_max - t_min) as f64 * frac) as i64;
        match DateTime::from_timestamp_millis(t_ms) {
            Some(ts) => ts.format(format).to_string(),
            None => String::new(),
        }
    };

    let left = tick_at(0.0);
    let mid = tick_at(0.5);
    let right = tick_at(1.0);

    let half = cfg.width / 2;
    let mut line = " ".repeat(indent);
    line.push_str(&left);
    let mid_pad = half.saturating_sub(left.len() + mid.len() / 2);
    line.push_str(&" ".repeat(mid_pad));
    line.push_str(&mid);
    let used = left.len() + mid_pad + mid.len();
    let right_pad = cfg.width.saturating_sub(used + right.len());
    line.push_str(&" ".repeat(right_pad));
    line.push_str(&right);
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(t: &str, v: f64) -> TrendPoint {
        TrendPoint {
            t: t.to_string(),
            v,
        }
    }

    #[test]
    fn test_prepare_drops_non_finite_and_sorts() {
        let input = vec![
            raw("2026-08-27T10:10:00Z", 21.0),
            raw("2026-08-27T10:00:00Z", 20.0),
            raw("2026-08-27T10:05:00Z", f64::NAN),
            raw("2026-08-27T10:15:00Z", f64::INFINITY),
            raw("not-a-timestamp", 19.0),
        ];

        let points = prepare_points(&input);
        assert_eq!(points.len(), 2);
        assert!(points.windows(2).all(|w| w[0].t_ms < w[1].t_ms));
        assert_eq!(points[0].v, 20.0);
        assert_eq!(points[1].v, 21.0);
    }

    #[test]
    fn test_gap_threshold_defaults_to_double_bucket() {
        assert_eq!(gap_threshold_ms(Some(300)), 600_000);
        assert_eq!(gap_threshold_ms(None), 600_000);
        assert_eq!(gap_threshold_ms(Some(1800)), 3_600_000);
    }

    #[test]
    fn test_segments_break_on_dropout() {
        let points = vec![
            Point { t_ms: 0, v: 1.0 },
            Point { t_ms: 300_000, v: 2.0 },
            // 900s hole, beyond the 600s threshold
            Point {
                t_ms: 1_200_000,
                v: 3.0,
            },
            Point {
                t_ms: 1_500_000,
                v: 4.0,
            },
        ];

        let segments = split_segments(&points, 600_000);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1].len(), 2);
    }

    #[test]
    fn test_single_missed_bucket_still_joins() {
        let points = vec![
            Point { t_ms: 0, v: 1.0 },
            // exactly 2x bucket width apart: still one segment
            Point { t_ms: 600_000, v: 2.0 },
        ];

        assert_eq!(split_segments(&points, 600_000).len(), 1);
    }

    #[test]
    fn test_render_empty_series() {
        let out = render("Temperature", "°C", 215, &[], ChartConfig::default());
        assert!(out.contains("(no data)"));
    }

    #[test]
    fn test_render_smoke() {
        let points = vec![
            Point { t_ms: 0, v: 10.0 },
            Point {
                t_ms: 300_000,
                v: 20.0,
            },
            Point {
                t_ms: 600_000,
                v: 15.0,
            },
        ];
        let segments = split_segments(&points, 600_000);
        let out = render("Humidity", "%", 111, &segments, ChartConfig::default());

        assert!(out.contains("Humidity [%]"));
        assert!(out.contains("20.0"));
        assert!(out.contains("10.0"));
        assert!(out.contains('•'));
    }
}
