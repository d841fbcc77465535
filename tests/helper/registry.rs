//! Registry test utilities

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockito::{Mock, ServerGuard};
use serde_json::Value;

use npm_visualizer::config::HttpConfig;
use npm_visualizer::stats::error::RegistryError;
use npm_visualizer::stats::registries::{JsDelivrStats, NpmRegistry, build_client};
use npm_visualizer::stats::registry::{DownloadStatsSource, PackageRegistry};
use npm_visualizer::stats::report::Visualizer;
use npm_visualizer::stats::types::{
    DownloadStats, PackageMetadata, RegistryCounts, SearchSuggestion,
};

/// In-memory package registry
#[derive(Default)]
pub struct FakeRegistry {
    packages: HashMap<String, PackageMetadata>,
    suggestions: Vec<SearchSuggestion>,
    counts: Option<RegistryCounts>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a package from its registry document
    pub fn with_package(mut self, document: Value) -> Self {
        let metadata: PackageMetadata = serde_json::from_value(document).unwrap();
        self.packages.insert(metadata.name.clone(), metadata);
        self
    }

    pub fn with_suggestion(mut self, name: &str, version: &str, description: &str) -> Self {
        self.suggestions.push(SearchSuggestion {
            name: name.to_string(),
            description: description.to_string(),
            version: version.to_string(),
        });
        self
    }

    pub fn with_counts(mut self, total_packages: u64, daily_downloads: u64) -> Self {
        self.counts = Some(RegistryCounts {
            total_packages,
            daily_downloads,
        });
        self
    }
}

#[async_trait]
impl PackageRegistry for FakeRegistry {
    async fn fetch_package(&self, package_name: &str) -> Result<PackageMetadata, RegistryError> {
        self.packages
            .get(package_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }

    async fn search_packages(
        &self,
        query: &str,
        size: usize,
    ) -> Result<Vec<SearchSuggestion>, RegistryError> {
        Ok(self
            .suggestions
            .iter()
            .filter(|s| s.name.contains(query))
            .take(size)
            .cloned()
            .collect())
    }

    async fn fetch_registry_counts(&self) -> Result<RegistryCounts, RegistryError> {
        self.counts.ok_or(RegistryError::Server(503))
    }
}

/// In-memory download statistics
#[derive(Default)]
pub struct FakeStats {
    stats: HashMap<String, DownloadStats>,
}

impl FakeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the jsDelivr stats document of a package
    pub fn with_stats(mut self, package_name: &str, document: Value) -> Self {
        self.stats.insert(
            package_name.to_string(),
            serde_json::from_value(document).unwrap(),
        );
        self
    }
}

#[async_trait]
impl DownloadStatsSource for FakeStats {
    async fn fetch_download_stats(
        &self,
        package_name: &str,
    ) -> Result<DownloadStats, RegistryError> {
        self.stats
            .get(package_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }
}

/// Visualizer over the in-memory sources
pub fn create_fake_visualizer(registry: FakeRegistry, stats: FakeStats) -> Visualizer {
    Visualizer::new(Arc::new(registry), Arc::new(stats))
}

/// Visualizer using the HTTP clients against a single mock server
pub fn create_http_visualizer(server: &ServerGuard) -> Visualizer {
    let client = build_client(&HttpConfig::default()).unwrap();
    let url = server.url();
    Visualizer::new(
        Arc::new(NpmRegistry::new(client.clone(), &url, &url)),
        Arc::new(JsDelivrStats::new(client, &url)),
    )
}

/// Serves `body` as JSON on `GET path`
pub async fn mock_json(server: &mut ServerGuard, path: &str, body: &Value) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// A registry document with one publish time per version
pub fn package_document(name: &str, latest: &str, versions: &[(&str, &str)]) -> Value {
    let mut time = serde_json::Map::new();
    time.insert("created".to_string(), "2015-01-01T00:00:00.000Z".into());
    time.insert("modified".to_string(), "2024-01-01T00:00:00.000Z".into());
    let mut manifests = serde_json::Map::new();
    for (version, published) in versions {
        time.insert(version.to_string(), (*published).into());
        manifests.insert(version.to_string(), serde_json::json!({}));
    }

    serde_json::json!({
        "name": name,
        "description": format!("{} description", name),
        "dist-tags": { "latest": latest },
        "versions": manifests,
        "time": time,
        "license": "MIT",
        "maintainers": [{ "name": "maintainer" }]
    })
}
