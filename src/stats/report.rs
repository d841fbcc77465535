//! Assembles a package report from the remote sources
//!
//! Metadata and download statistics are fetched concurrently. Missing
//! download statistics degrade the chart to an empty series; missing
//! metadata fails the whole report.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{DEFAULT_SEARCH_SIZE, DEFAULT_VERSION_LIMIT, MIN_SEARCH_QUERY_LEN};
use crate::stats::error::ReportError;
use crate::stats::package_info::PackageInfo;
use crate::stats::reconcile::reconcile;
use crate::stats::registry::{BundleSizeSource, DownloadStatsSource, PackageRegistry};
use crate::stats::types::{BundleSize, DownloadStats, ReconciledSeries, SearchSuggestion};

/// Share of packages assumed to have an active maintainer
const ACTIVE_USER_RATIO: f64 = 0.05;

/// Average number of versions per package used for the data point estimate
const VERSIONS_PER_PACKAGE: u64 = 5;

const DAYS_PER_YEAR: u64 = 365;

/// Counts shown when the registry cannot be reached
pub const FALLBACK_OVERVIEW: RegistryOverview = RegistryOverview {
    total_packages: 2_000_000,
    daily_downloads: 4_000_000_000,
    active_users: 200_000,
    data_points: 3_650_000_000,
    source: OverviewSource::Fallback,
};

/// Everything displayed for a single package
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageReport {
    pub info: PackageInfo,
    /// All-time downloads reported by the statistics source
    pub total_downloads: u64,
    pub series: ReconciledSeries,
    pub bundle: Option<BundleInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BundleInfo {
    Available(BundleSize),
    Unavailable { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverviewSource {
    Live,
    Fallback,
}

/// Registry-wide numbers for the landing summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryOverview {
    pub total_packages: u64,
    pub daily_downloads: u64,
    pub active_users: u64,
    pub data_points: u64,
    pub source: OverviewSource,
}

/// Fetches and combines package data from the configured sources
pub struct Visualizer {
    registry: Arc<dyn PackageRegistry>,
    stats: Arc<dyn DownloadStatsSource>,
    bundle: Option<Arc<dyn BundleSizeSource>>,
    version_limit: usize,
    search_size: usize,
    min_query_len: usize,
}

impl Visualizer {
    pub fn new(registry: Arc<dyn PackageRegistry>, stats: Arc<dyn DownloadStatsSource>) -> Self {
        Self {
            registry,
            stats,
            bundle: None,
            version_limit: DEFAULT_VERSION_LIMIT,
            search_size: DEFAULT_SEARCH_SIZE,
            min_query_len: MIN_SEARCH_QUERY_LEN,
        }
    }

    /// Also look up bundle sizes when building reports
    pub fn with_bundle_source(mut self, bundle: Arc<dyn BundleSizeSource>) -> Self {
        self.bundle = Some(bundle);
        self
    }

    pub fn with_version_limit(mut self, limit: usize) -> Self {
        self.version_limit = limit;
        self
    }

    pub fn with_search(mut self, size: usize, min_query_len: usize) -> Self {
        self.search_size = size;
        self.min_query_len = min_query_len;
        self
    }

    /// Build the report for `package_name`
    pub async fn load_report(&self, package_name: &str) -> Result<PackageReport, ReportError> {
        let package_name = package_name.trim();
        if package_name.is_empty() {
            return Err(ReportError::EmptyPackageName);
        }

        info!("Loading report for {}", package_name);

        let (metadata, stats) = futures::join!(
            self.registry.fetch_package(package_name),
            self.stats.fetch_download_stats(package_name)
        );

        let metadata = metadata?;
        let stats = stats.unwrap_or_else(|e| {
            warn!(
                "Download stats unavailable for {}, continuing without them: {}",
                package_name, e
            );
            DownloadStats::default()
        });

        let series = reconcile(&metadata.time, &stats.versions, self.version_limit);
        let info = PackageInfo::from_metadata(&metadata);

        let bundle = match &self.bundle {
            Some(source) => Some(match source.fetch_bundle_size(package_name).await {
                Ok(size) => BundleInfo::Available(size),
                Err(e) => {
                    warn!("Bundle size unavailable for {}: {}", package_name, e);
                    BundleInfo::Unavailable {
                        message: e.user_message(),
                    }
                }
            }),
            None => None,
        };

        info!(
            "Loaded {} ({} versions charted)",
            info.name,
            series.len()
        );

        Ok(PackageReport {
            info,
            total_downloads: stats.total.unwrap_or(0),
            series,
            bundle,
        })
    }

    /// Package name suggestions for a partial query.
    ///
    /// Short queries and failed lookups both yield an empty list.
    pub async fn suggest(&self, query: &str) -> Vec<SearchSuggestion> {
        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            return Vec::new();
        }

        self.registry
            .search_packages(query, self.search_size)
            .await
            .unwrap_or_else(|e| {
                warn!("Search failed for {:?}: {}", query, e);
                Vec::new()
            })
    }

    /// Registry-wide counts, or [`FALLBACK_OVERVIEW`] when they cannot be fetched
    pub async fn registry_overview(&self) -> RegistryOverview {
        match self.registry.fetch_registry_counts().await {
            Ok(counts) => RegistryOverview {
                total_packages: counts.total_packages,
                daily_downloads: counts.daily_downloads,
                active_users: (counts.total_packages as f64 * ACTIVE_USER_RATIO).round() as u64,
                data_points: counts
                    .total_packages
                    .saturating_mul(VERSIONS_PER_PACKAGE)
                    .saturating_mul(DAYS_PER_YEAR),
                source: OverviewSource::Live,
            },
            Err(e) => {
                warn!("Registry overview unavailable, using fallback: {}", e);
                FALLBACK_OVERVIEW
            }
        }
    }
}
