//! Text charts of the downloads-by-version series

use crate::config::ChartKind;
use crate::render::format::format_thousands;
use crate::stats::types::ReconciledSeries;

pub const CHART_TITLE: &str = "Downloads by Version";
pub const EMPTY_SERIES_MESSAGE: &str = "No download statistics available";

/// Rows of the line chart plot area
const LINE_CHART_HEIGHT: usize = 10;

const BAR: char = '█';
const POINT: char = '●';

/// Render `series` as the requested chart kind.
///
/// `width` is the length of the longest bar in bar and pie charts.
pub fn render_chart(kind: ChartKind, series: &ReconciledSeries, width: usize) -> String {
    if kind == ChartKind::None {
        return String::new();
    }

    if series.is_empty() {
        return format!("{}\n  {}\n", CHART_TITLE, EMPTY_SERIES_MESSAGE);
    }

    match kind {
        ChartKind::Line => line_chart(series, LINE_CHART_HEIGHT),
        ChartKind::Bar => bar_chart(series, width),
        ChartKind::Pie => pie_chart(series, width),
        ChartKind::None => String::new(),
    }
}

fn label_width(series: &ReconciledSeries) -> usize {
    series.labels().map(|l| l.chars().count()).max().unwrap_or(0)
}

/// Number of cells for `value` on a `0..=max` scale of `width` cells
fn scaled(value: u64, max: u64, width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    ((value as f64 / max as f64) * width as f64).round() as usize
}

fn bar_chart(series: &ReconciledSeries, width: usize) -> String {
    let label_width = label_width(series);
    let max = series.max();

    let mut out = format!("{}\n", CHART_TITLE);
    for point in &series.points {
        let bar: String = std::iter::repeat_n(BAR, scaled(point.total, max, width)).collect();
        out.push_str(&format!(
            "  {:>label_width$} │{} {}\n",
            point.version,
            bar,
            format_thousands(point.total),
        ));
    }
    out
}

fn pie_chart(series: &ReconciledSeries, width: usize) -> String {
    let label_width = label_width(series);
    let sum = series.sum();

    let mut out = format!("{}\n", CHART_TITLE);
    for point in &series.points {
        let share = if sum == 0 {
            0.0
        } else {
            point.total as f64 / sum as f64 * 100.0
        };
        let bar: String = std::iter::repeat_n(BAR, scaled(point.total, sum, width)).collect();
        out.push_str(&format!(
            "  {:>label_width$} │{:<width$} {:>5.1}% ({})\n",
            point.version,
            bar,
            share,
            format_thousands(point.total),
        ));
    }
    out
}

fn line_chart(series: &ReconciledSeries, height: usize) -> String {
    let max = series.max();
    let top = height.saturating_sub(1);
    let rows: Vec<usize> = series.totals().map(|t| scaled(t, max, top)).collect();

    let column_width = label_width(series) + 2;
    let max_label = format_thousands(max);
    let axis_width = max_label.len();

    let mut out = format!("{}\n", CHART_TITLE);
    for row in (0..height).rev() {
        let axis_label = if row == top {
            max_label.as_str()
        } else if row == 0 {
            "0"
        } else {
            ""
        };
        out.push_str(&format!("{:>axis_width$} ┤", axis_label));

        for point_row in &rows {
            let cell = if *point_row == row {
                POINT.to_string()
            } else {
                " ".to_string()
            };
            out.push_str(&format!("{:^column_width$}", cell));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "{:>axis_width$} └{}\n",
        "",
        "─".repeat(column_width * rows.len())
    ));
    out.push_str(&format!("{:>axis_width$}  ", ""));
    for label in series.labels() {
        out.push_str(&format!("{:^column_width$}", label));
    }
    out.push('\n');

    for point in &series.points {
        out.push_str(&format!(
            "  Version {}: {} downloads\n",
            point.version,
            format_thousands(point.total)
        ));
    }
    out
}
