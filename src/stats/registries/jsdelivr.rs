//! jsDelivr package statistics API implementation

use reqwest::Client;
use tracing::debug;

use crate::stats::error::RegistryError;
use crate::stats::registries::{check_status, parse_json};
use crate::stats::registry::DownloadStatsSource;
use crate::stats::types::DownloadStats;

const SOURCE: &str = "jsDelivr";

/// Download statistics from `data.jsdelivr.com`
pub struct JsDelivrStats {
    client: Client,
    base_url: String,
}

impl JsDelivrStats {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl DownloadStatsSource for JsDelivrStats {
    async fn fetch_download_stats(
        &self,
        package_name: &str,
    ) -> Result<DownloadStats, RegistryError> {
        // jsDelivr takes scoped names unescaped: /npm/@scope/name/stats
        let url = format!("{}/v1/package/npm/{}/stats", self.base_url, package_name);
        debug!("Fetching download stats: {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, package_name, SOURCE)?;
        parse_json(response, SOURCE).await
    }
}
