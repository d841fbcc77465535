//! npm registry API implementation

use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::stats::error::RegistryError;
use crate::stats::registries::{check_status, encode_package_name, parse_json, url_with_params};
use crate::stats::registry::PackageRegistry;
use crate::stats::types::{PackageMetadata, RegistryCounts, SearchSuggestion};

const SOURCE: &str = "npm registry";

/// Query used to estimate the number of published packages
const PACKAGE_COUNT_QUERY: &str = "keywords:javascript";

const NO_DESCRIPTION: &str = "No description available";

/// Response from `/-/v1/search`
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    objects: Vec<SearchObject>,
    #[serde(default)]
    total: u64,
}

#[derive(Debug, Deserialize)]
struct SearchObject {
    package: SearchPackage,
}

#[derive(Debug, Deserialize)]
struct SearchPackage {
    name: String,
    description: Option<String>,
    #[serde(default)]
    version: String,
}

/// Response from `/downloads/point/{period}`
#[derive(Debug, Deserialize)]
struct DownloadsPointResponse {
    downloads: u64,
}

/// Registry implementation for the npm registry and downloads APIs
pub struct NpmRegistry {
    client: Client,
    base_url: String,
    downloads_api_url: String,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with custom base URLs
    pub fn new(client: Client, base_url: &str, downloads_api_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            downloads_api_url: downloads_api_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, query: &str, size: usize) -> Result<Url, RegistryError> {
        let size = size.to_string();
        url_with_params(
            &format!("{}/-/v1/search", self.base_url),
            &[("text", query), ("size", size.as_str())],
        )
    }

    async fn search(&self, query: &str, size: usize) -> Result<SearchResponse, RegistryError> {
        let url = self.search_url(query, size)?;
        let response = self.client.get(url).send().await?;
        let response = check_status(response, query, SOURCE)?;
        parse_json(response, SOURCE).await
    }

    async fn fetch_last_day_downloads(&self) -> Result<u64, RegistryError> {
        let url = format!("{}/downloads/point/last-day", self.downloads_api_url);
        let response = self.client.get(&url).send().await?;
        let response = check_status(response, "last-day", "npm downloads API")?;
        let point: DownloadsPointResponse = parse_json(response, "npm downloads API").await?;
        Ok(point.downloads)
    }
}

#[async_trait::async_trait]
impl PackageRegistry for NpmRegistry {
    async fn fetch_package(&self, package_name: &str) -> Result<PackageMetadata, RegistryError> {
        let url = format!("{}/{}", self.base_url, encode_package_name(package_name));
        debug!("Fetching package metadata: {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, package_name, SOURCE)?;
        parse_json(response, SOURCE).await
    }

    async fn search_packages(
        &self,
        query: &str,
        size: usize,
    ) -> Result<Vec<SearchSuggestion>, RegistryError> {
        let result = self.search(query, size).await?;

        Ok(result
            .objects
            .into_iter()
            .map(|obj| SearchSuggestion {
                name: obj.package.name,
                description: obj
                    .package
                    .description
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                version: obj.package.version,
            })
            .collect())
    }

    async fn fetch_registry_counts(&self) -> Result<RegistryCounts, RegistryError> {
        let (search, daily_downloads) = futures::try_join!(
            self.search(PACKAGE_COUNT_QUERY, 1),
            self.fetch_last_day_downloads()
        )?;

        Ok(RegistryCounts {
            total_packages: search.total,
            daily_downloads,
        })
    }
}
