//! Traits for the remote sources a report is assembled from

#[cfg(test)]
use mockall::automock;

use crate::stats::error::RegistryError;
use crate::stats::types::{
    BundleSize, DownloadStats, PackageMetadata, RegistryCounts, SearchSuggestion,
};

/// Package metadata and search, backed by the npm registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Fetches the full registry document for a package
    ///
    /// # Arguments
    /// * `package_name` - The name of the package (e.g., "@types/node")
    async fn fetch_package(&self, package_name: &str) -> Result<PackageMetadata, RegistryError>;

    /// Returns at most `size` packages matching `query`
    async fn search_packages(
        &self,
        query: &str,
        size: usize,
    ) -> Result<Vec<SearchSuggestion>, RegistryError>;

    /// Fetches the total package count and yesterday's download count
    async fn fetch_registry_counts(&self) -> Result<RegistryCounts, RegistryError>;
}

/// Per-version download statistics
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DownloadStatsSource: Send + Sync {
    async fn fetch_download_stats(&self, package_name: &str)
    -> Result<DownloadStats, RegistryError>;
}

/// Bundle and install size of a package
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait BundleSizeSource: Send + Sync {
    async fn fetch_bundle_size(&self, package_name: &str) -> Result<BundleSize, RegistryError>;
}
