//! Summary card, search suggestions and registry overview

use crate::render::format::{format_bytes, format_compact, format_date, format_thousands};
use crate::stats::report::{BundleInfo, OverviewSource, PackageReport, RegistryOverview};
use crate::stats::types::{BundleSize, SearchSuggestion};

const LABEL_WIDTH: usize = 20;

fn row(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("  {:<LABEL_WIDTH$}{}\n", format!("{}:", label), value));
}

fn section(out: &mut String, title: &str) {
    out.push_str(&format!("\n{}\n", title));
}

/// Render the package summary card
pub fn render_card(report: &PackageReport) -> String {
    let info = &report.info;
    let mut out = String::new();

    out.push_str(&format!("{}\n", info.name));
    out.push_str(&format!("{}\n", info.description));

    section(&mut out, "Overview");
    row(&mut out, "Version", info.version.as_deref().unwrap_or("Unknown"));
    row(&mut out, "Total Versions", &info.total_versions.to_string());
    row(&mut out, "License", &info.license);
    row(&mut out, "Author", &info.author);

    section(&mut out, "Publish Information");
    row(&mut out, "First Published", &format_date(info.created.as_ref()));
    row(&mut out, "Last Updated", &format_date(info.modified.as_ref()));
    row(
        &mut out,
        "Total Downloads",
        &format_thousands(report.total_downloads),
    );

    if !info.maintainers.is_empty() {
        section(&mut out, "Maintainers");
        out.push_str(&format!("  {}\n", info.maintainers.join(", ")));
    }

    // A lone "latest" tag repeats the version row
    if info.dist_tags.len() > 1 {
        section(&mut out, "Distribution Tags");
        for (tag, version) in &info.dist_tags {
            row(&mut out, tag, version);
        }
    }

    if !info.keywords.is_empty() {
        section(&mut out, "Keywords");
        out.push_str(&format!("  {}\n", info.keywords.join(", ")));
    }

    let dependency_groups = [
        ("Dependencies", &info.dependencies),
        ("Dev Dependencies", &info.dev_dependencies),
        ("Peer Dependencies", &info.peer_dependencies),
    ];
    if dependency_groups.iter().any(|(_, deps)| !deps.is_empty()) {
        section(&mut out, "Dependencies");
        for (label, deps) in dependency_groups {
            if !deps.is_empty() {
                row(&mut out, label, &deps.len().to_string());
            }
        }
    }

    section(&mut out, "Links");
    row(&mut out, "NPM Package", &info.npm_url());
    if let Some(repository) = info.repository_web_url() {
        row(&mut out, "Repository", &repository);
    }
    if let Some(homepage) = &info.homepage {
        row(&mut out, "Homepage", homepage);
    }
    if let Some(bugs) = &info.bugs {
        row(&mut out, "Report Issues", bugs);
    }

    if let Some(bundle) = &report.bundle {
        section(&mut out, "Bundle Size");
        match bundle {
            BundleInfo::Available(size) => render_bundle_size(&mut out, size),
            BundleInfo::Unavailable { message } => {
                out.push_str(&format!("  Unavailable: {}\n", message));
            }
        }
    }

    out
}

fn render_bundle_size(out: &mut String, size: &BundleSize) {
    let rows = [
        ("Minified", size.size.map(format_bytes)),
        ("Gzipped", size.gzip.map(format_bytes)),
        ("Dependencies", size.dependency_count.map(|c| c.to_string())),
        ("Install Size", size.install_size.map(format_bytes)),
        ("Publish Size", size.publish_size.map(format_bytes)),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            row(out, label, &value);
        }
    }
}

/// One line per suggestion: `name@version  description`
pub fn render_suggestions(suggestions: &[SearchSuggestion]) -> String {
    if suggestions.is_empty() {
        return "No matching packages\n".to_string();
    }

    let name_width = suggestions
        .iter()
        .map(|s| s.name.chars().count() + s.version.chars().count() + 1)
        .max()
        .unwrap_or(0);

    suggestions
        .iter()
        .map(|s| {
            format!(
                "{:<name_width$}  {}\n",
                format!("{}@{}", s.name, s.version),
                s.description
            )
        })
        .collect()
}

pub fn render_overview(overview: &RegistryOverview) -> String {
    let mut out = String::from("npm registry\n");
    row(&mut out, "Packages", &format_compact(overview.total_packages));
    row(
        &mut out,
        "Daily Downloads",
        &format_compact(overview.daily_downloads),
    );
    row(&mut out, "Active Users", &format_compact(overview.active_users));
    row(&mut out, "Data Points", &format_compact(overview.data_points));
    if overview.source == OverviewSource::Fallback {
        out.push_str("  (estimated: registry unreachable)\n");
    }
    out
}
