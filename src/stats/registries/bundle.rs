//! Bundle size from bundlephobia and install size from packagephobia

use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::stats::error::RegistryError;
use crate::stats::registries::{check_status, parse_json, url_with_params};
use crate::stats::registry::BundleSizeSource;
use crate::stats::types::{BundleSize, lenient_count};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundlephobiaResponse {
    #[serde(default, deserialize_with = "lenient_count")]
    size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    gzip: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    dependency_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct PackagephobiaResponse {
    install: Option<PackagephobiaSize>,
    publish: Option<PackagephobiaSize>,
}

#[derive(Debug, Deserialize)]
struct PackagephobiaSize {
    #[serde(default, deserialize_with = "lenient_count")]
    bytes: Option<u64>,
}

/// Combines bundlephobia and packagephobia into a single size report
pub struct BundleSizeRegistry {
    client: Client,
    bundlephobia_url: String,
    packagephobia_url: String,
}

impl BundleSizeRegistry {
    pub fn new(client: Client, bundlephobia_url: &str, packagephobia_url: &str) -> Self {
        Self {
            client,
            bundlephobia_url: bundlephobia_url.trim_end_matches('/').to_string(),
            packagephobia_url: packagephobia_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        package_name: &str,
        source: &str,
    ) -> Result<T, RegistryError> {
        debug!("Fetching {} size: {}", source, url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let response = check_status(response, package_name, source)?;
        parse_json(response, source).await
    }
}

#[async_trait::async_trait]
impl BundleSizeSource for BundleSizeRegistry {
    async fn fetch_bundle_size(&self, package_name: &str) -> Result<BundleSize, RegistryError> {
        let bundle_url = url_with_params(
            &format!("{}/api/size", self.bundlephobia_url),
            &[("package", package_name)],
        )?;
        let install_url = url_with_params(
            &format!("{}/v2/api.json", self.packagephobia_url),
            &[("p", package_name)],
        )?;

        let (bundle, install) = futures::join!(
            self.fetch_json::<BundlephobiaResponse>(bundle_url, package_name, "bundlephobia"),
            self.fetch_json::<PackagephobiaResponse>(install_url, package_name, "packagephobia")
        );

        match (bundle, install) {
            (Err(bundle_err), Err(install_err)) => {
                warn!(
                    "Size lookup failed for {}: bundlephobia: {}, packagephobia: {}",
                    package_name, bundle_err, install_err
                );
                Err(bundle_err)
            }
            (bundle, install) => {
                let bundle = bundle
                    .inspect_err(|e| warn!("bundlephobia failed for {}: {}", package_name, e))
                    .ok();
                let install = install
                    .inspect_err(|e| warn!("packagephobia failed for {}: {}", package_name, e))
                    .ok();

                Ok(BundleSize {
                    size: bundle.as_ref().and_then(|b| b.size),
                    gzip: bundle.as_ref().and_then(|b| b.gzip),
                    dependency_count: bundle.as_ref().and_then(|b| b.dependency_count),
                    install_size: install
                        .as_ref()
                        .and_then(|i| i.install.as_ref())
                        .and_then(|s| s.bytes),
                    publish_size: install
                        .as_ref()
                        .and_then(|i| i.publish.as_ref())
                        .and_then(|s| s.bytes),
                })
            }
        }
    }
}
