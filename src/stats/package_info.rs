//! Summary of a package derived from its registry document

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::stats::semver::{find_stable_max, is_metadata_key};
use crate::stats::types::{PackageMetadata, VersionManifest};

const NO_DESCRIPTION: &str = "No description available";
const UNKNOWN: &str = "Unknown";
const NPM_PACKAGE_URL: &str = "https://www.npmjs.com/package";

/// Everything the summary card shows about a package
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub description: String,
    /// `dist-tags.latest`, or the highest stable version when the tag is missing
    pub version: Option<String>,
    pub author: String,
    pub license: String,
    pub repository: Option<String>,
    pub homepage: Option<String>,
    pub bugs: Option<String>,
    pub keywords: Vec<String>,
    pub maintainers: Vec<String>,
    pub dist_tags: IndexMap<String, String>,
    pub dependencies: IndexMap<String, String>,
    pub dev_dependencies: IndexMap<String, String>,
    pub peer_dependencies: IndexMap<String, String>,
    pub total_versions: usize,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

impl PackageInfo {
    pub fn from_metadata(metadata: &PackageMetadata) -> Self {
        let version = metadata
            .dist_tags
            .get("latest")
            .cloned()
            .or_else(|| find_stable_max(metadata.versions.keys()));

        let latest_manifest = version
            .as_ref()
            .and_then(|v| metadata.versions.get(v))
            .cloned()
            .unwrap_or_default();
        let VersionManifest {
            dependencies,
            dev_dependencies,
            peer_dependencies,
        } = latest_manifest;

        let maintainers: Vec<String> = metadata
            .maintainers
            .iter()
            .filter_map(|m| m.name())
            .map(str::to_string)
            .collect();

        let author = metadata
            .author
            .as_ref()
            .and_then(|a| a.name())
            .map(str::to_string)
            .or_else(|| maintainers.first().cloned())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let total_versions = if metadata.versions.is_empty() {
            metadata
                .time
                .keys()
                .filter(|k| !is_metadata_key(k))
                .count()
        } else {
            metadata.versions.len()
        };

        Self {
            name: metadata.name.clone(),
            description: non_empty(metadata.description.as_deref())
                .unwrap_or(NO_DESCRIPTION)
                .to_string(),
            version,
            author,
            license: metadata
                .license
                .as_ref()
                .and_then(|l| non_empty(l.as_str()))
                .unwrap_or(UNKNOWN)
                .to_string(),
            repository: metadata
                .repository
                .as_ref()
                .and_then(|r| non_empty(r.url()))
                .map(str::to_string),
            homepage: non_empty(metadata.homepage.as_deref()).map(str::to_string),
            bugs: metadata
                .bugs
                .as_ref()
                .and_then(|b| non_empty(b.url()))
                .map(str::to_string),
            keywords: metadata
                .keywords
                .clone()
                .map(|k| k.into_vec())
                .unwrap_or_default(),
            maintainers,
            dist_tags: metadata.dist_tags.clone(),
            dependencies,
            dev_dependencies,
            peer_dependencies,
            total_versions,
            created: parse_time(metadata, "created"),
            modified: parse_time(metadata, "modified"),
        }
    }

    /// Link to the package page on npmjs.com
    pub fn npm_url(&self) -> String {
        format!("{}/{}", NPM_PACKAGE_URL, self.name)
    }

    /// Repository URL rewritten into something a browser can open
    pub fn repository_web_url(&self) -> Option<String> {
        self.repository.as_deref().map(clean_repository_url)
    }
}

/// Rewrite a `repository.url` value (`git+https://...git`, `git://`,
/// `ssh://git@`) into an https URL.
pub fn clean_repository_url(url: &str) -> String {
    let url = url.strip_prefix("git+").unwrap_or(url);
    let url = url.strip_suffix(".git").unwrap_or(url);

    if let Some(rest) = url.strip_prefix("ssh://git@") {
        format!("https://{}", rest)
    } else if let Some(rest) = url.strip_prefix("git://") {
        format!("https://{}", rest)
    } else {
        url.to_string()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_time(metadata: &PackageMetadata, key: &str) -> Option<DateTime<Utc>> {
    let raw = metadata.time.get(key)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn metadata(value: serde_json::Value) -> PackageMetadata {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn from_metadata_builds_full_summary() {
        let metadata = metadata(json!({
            "name": "axios",
            "description": "Promise based HTTP client",
            "dist-tags": { "latest": "1.6.0", "next": "2.0.0-beta.1" },
            "versions": {
                "1.5.0": {},
                "1.6.0": {
                    "dependencies": { "follow-redirects": "^1.15.0" },
                    "devDependencies": { "jest": "^29.0.0" },
                    "peerDependencies": {}
                }
            },
            "time": {
                "created": "2014-08-29T23:08:36.810Z",
                "modified": "2023-10-26T18:05:52.000Z",
                "1.5.0": "2023-08-26T00:00:00.000Z",
                "1.6.0": "2023-10-26T00:00:00.000Z"
            },
            "author": { "name": "Matt Zabriskie" },
            "maintainers": [{ "name": "jasonsaayman" }, { "name": "emilyhsu" }],
            "license": "MIT",
            "repository": { "type": "git", "url": "git+https://github.com/axios/axios.git" },
            "homepage": "https://axios-http.com",
            "bugs": { "url": "https://github.com/axios/axios/issues" },
            "keywords": ["xhr", "http"]
        }));

        let info = PackageInfo::from_metadata(&metadata);

        assert_eq!(info.name, "axios");
        assert_eq!(info.description, "Promise based HTTP client");
        assert_eq!(info.version.as_deref(), Some("1.6.0"));
        assert_eq!(info.author, "Matt Zabriskie");
        assert_eq!(info.license, "MIT");
        assert_eq!(info.homepage.as_deref(), Some("https://axios-http.com"));
        assert_eq!(
            info.bugs.as_deref(),
            Some("https://github.com/axios/axios/issues")
        );
        assert_eq!(info.keywords, vec!["xhr", "http"]);
        assert_eq!(info.maintainers, vec!["jasonsaayman", "emilyhsu"]);
        assert_eq!(info.dist_tags.len(), 2);
        assert_eq!(
            info.dependencies.get("follow-redirects").map(String::as_str),
            Some("^1.15.0")
        );
        assert_eq!(info.dev_dependencies.len(), 1);
        assert_eq!(info.total_versions, 2);
        assert_eq!(
            info.created,
            Some(Utc.with_ymd_and_hms(2014, 8, 29, 23, 8, 36).unwrap()
                + chrono::Duration::milliseconds(810))
        );
        assert_eq!(
            info.repository_web_url().as_deref(),
            Some("https://github.com/axios/axios")
        );
        assert_eq!(info.npm_url(), "https://www.npmjs.com/package/axios");
    }

    #[test]
    fn package_info_serializes_dates_as_rfc3339() {
        let info = PackageInfo::from_metadata(&metadata(json!({
            "name": "pkg",
            "time": { "created": "2014-08-29T23:08:36.810Z" }
        })));

        let value = serde_json::to_value(&info).unwrap();

        let created = value["created"].as_str().unwrap();
        assert!(created.starts_with("2014-08-29T23:08:36.810"));
        assert_eq!(
            created.parse::<DateTime<Utc>>().ok(),
            info.created
        );
        assert!(value["modified"].is_null());
    }

    #[test]
    fn from_metadata_applies_defaults() {
        let info = PackageInfo::from_metadata(&metadata(json!({ "name": "bare" })));

        assert_eq!(info.description, "No description available");
        assert_eq!(info.author, "Unknown");
        assert_eq!(info.license, "Unknown");
        assert_eq!(info.version, None);
        assert_eq!(info.repository, None);
        assert!(info.keywords.is_empty());
        assert_eq!(info.total_versions, 0);
        assert_eq!(info.created, None);
    }

    #[test]
    fn from_metadata_falls_back_to_first_maintainer_for_author() {
        let info = PackageInfo::from_metadata(&metadata(json!({
            "name": "pkg",
            "maintainers": [{ "name": "first" }, { "name": "second" }]
        })));

        assert_eq!(info.author, "first");
    }

    #[test]
    fn from_metadata_uses_highest_stable_version_without_latest_tag() {
        let info = PackageInfo::from_metadata(&metadata(json!({
            "name": "pkg",
            "versions": { "1.0.0": {}, "1.2.0": {}, "2.0.0-rc.1": {} }
        })));

        assert_eq!(info.version.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn from_metadata_reads_legacy_license_object() {
        let info = PackageInfo::from_metadata(&metadata(json!({
            "name": "pkg",
            "license": { "type": "BSD-3-Clause", "url": "http://example.com" }
        })));

        assert_eq!(info.license, "BSD-3-Clause");
    }

    #[rstest]
    #[case("git+https://github.com/a/b.git", "https://github.com/a/b")]
    #[case("git://github.com/a/b.git", "https://github.com/a/b")]
    #[case("git+ssh://git@github.com/a/b.git", "https://github.com/a/b")]
    #[case("https://github.com/a/b", "https://github.com/a/b")]
    fn clean_repository_url_returns_https(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(clean_repository_url(input), expected);
    }
}
