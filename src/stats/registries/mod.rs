//! HTTP implementations of the registry traits

pub mod bundle;
pub mod jsdelivr;
pub mod npm;

pub use bundle::BundleSizeRegistry;
pub use jsdelivr::JsDelivrStats;
pub use npm::NpmRegistry;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::HttpConfig;
use crate::stats::error::RegistryError;

/// Builds the HTTP client shared by all registry implementations
pub fn build_client(config: &HttpConfig) -> Result<Client, RegistryError> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()?;
    Ok(client)
}

/// Encode package name for URL paths (handles scoped packages)
pub(crate) fn encode_package_name(package_name: &str) -> String {
    if package_name.starts_with('@') {
        // Scoped package: @scope/name -> @scope%2Fname
        package_name.replace('/', "%2F")
    } else {
        package_name.to_string()
    }
}

/// Appends URL-encoded query parameters to `base`
pub(crate) fn url_with_params(base: &str, params: &[(&str, &str)]) -> Result<Url, RegistryError> {
    Url::parse_with_params(base, params).map_err(|e| RegistryError::InvalidUrl(e.to_string()))
}

/// Classifies an unsuccessful response by status code
pub(crate) fn check_status(
    response: Response,
    package_name: &str,
    source: &str,
) -> Result<Response, RegistryError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(package_name.to_string()));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(RegistryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    warn!("{} returned status {}: {}", source, status, response.url());

    if status.is_server_error() {
        return Err(RegistryError::Server(status.as_u16()));
    }

    Err(RegistryError::InvalidResponse(format!(
        "Unexpected status: {}",
        status
    )))
}

/// Decodes a JSON body, reporting decode failures as invalid responses
pub(crate) async fn parse_json<T: DeserializeOwned>(
    response: Response,
    source: &str,
) -> Result<T, RegistryError> {
    response.json().await.map_err(|e| {
        warn!("Failed to parse {} response: {}", source, e);
        RegistryError::InvalidResponse(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("lodash", "lodash")]
    #[case("@types/node", "@types%2Fnode")]
    fn encode_package_name_escapes_scope_separator(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(encode_package_name(input), expected);
    }
}
