//! Terminal rendering of reports
//!
//! - [`card`]: Summary card, search suggestions and registry overview
//! - [`chart`]: Line, bar and pie charts of the downloads-by-version series
//! - [`format`]: Number, size and date formatting

pub mod card;
pub mod chart;
pub mod format;

use crate::config::ChartKind;
use crate::stats::report::PackageReport;

/// Summary card followed by the chart
pub fn render_report(report: &PackageReport, kind: ChartKind, width: usize) -> String {
    let mut out = card::render_card(report);
    let chart = chart::render_chart(kind, &report.series, width);
    if !chart.is_empty() {
        out.push('\n');
        out.push_str(&chart);
    }
    out
}
