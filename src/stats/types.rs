//! Data shapes shared between the registry clients, the reconciler and the renderers
//!
//! Remote payloads are loosely typed, so every optional field is an `Option`
//! or a defaulted collection. Maps use [`IndexMap`] to keep the order the
//! remote API sent them in.

use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Publish time per version, plus the `created` / `modified` metadata keys
pub type VersionTimestamps = IndexMap<String, Value>;

/// Download statistics per version
pub type DownloadRecord = IndexMap<String, VersionDownloads>;

/// Package document returned by `GET {registry}/{name}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackageMetadata {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "dist-tags")]
    pub dist_tags: IndexMap<String, String>,
    #[serde(deserialize_with = "lenient_manifests")]
    pub versions: IndexMap<String, VersionManifest>,
    pub time: VersionTimestamps,
    pub author: Option<Person>,
    pub maintainers: Vec<Person>,
    pub license: Option<License>,
    pub repository: Option<UrlField>,
    pub homepage: Option<String>,
    pub bugs: Option<UrlField>,
    pub keywords: Option<Keywords>,
}

/// Subset of a single version's manifest.
///
/// Old publishes carry dependency fields in other shapes (`[]`, `null`);
/// those read as empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionManifest {
    #[serde(deserialize_with = "lenient_dependencies")]
    pub dependencies: IndexMap<String, String>,
    #[serde(deserialize_with = "lenient_dependencies")]
    pub dev_dependencies: IndexMap<String, String>,
    #[serde(deserialize_with = "lenient_dependencies")]
    pub peer_dependencies: IndexMap<String, String>,
}

/// `author` / `maintainers[]` entry, either `"Name <mail>"` or `{ "name": .. }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Person {
    Plain(String),
    Object { name: Option<String> },
}

impl Person {
    pub fn name(&self) -> Option<&str> {
        let name = match self {
            Person::Plain(s) => s.split('<').next().unwrap_or(s).trim(),
            Person::Object { name } => name.as_deref()?.trim(),
        };
        (!name.is_empty()).then_some(name)
    }
}

/// `license` field, either an SPDX string or the legacy `{ "type": .. }` form
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum License {
    Plain(String),
    Object {
        #[serde(rename = "type")]
        kind: Option<String>,
    },
}

impl License {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            License::Plain(s) => Some(s.as_str()),
            License::Object { kind } => kind.as_deref(),
        }
    }
}

/// `repository` / `bugs` field, either a URL string or `{ "url": .. }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UrlField {
    Plain(String),
    Object { url: Option<String> },
}

impl UrlField {
    pub fn url(&self) -> Option<&str> {
        match self {
            UrlField::Plain(s) => Some(s.as_str()),
            UrlField::Object { url } => url.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
    List(Vec<String>),
    Single(String),
}

impl Keywords {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Keywords::List(list) => list,
            Keywords::Single(s) => s
                .split([',', ' '])
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// jsDelivr package statistics
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DownloadStats {
    #[serde(deserialize_with = "lenient_count")]
    pub total: Option<u64>,
    /// Entries that are not objects are left out
    #[serde(deserialize_with = "lenient_download_record")]
    pub versions: DownloadRecord,
}

/// Download statistics of a single version.
///
/// `total` is `None` unless the value is an object carrying a non-negative
/// numeric `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct VersionDownloads {
    pub total: Option<u64>,
}

impl From<Value> for VersionDownloads {
    fn from(value: Value) -> Self {
        Self {
            total: value.get("total").and_then(count_from_value),
        }
    }
}

impl VersionDownloads {
    pub fn new(total: u64) -> Self {
        Self { total: Some(total) }
    }
}

/// One point of the downloads-by-version chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDownloadPoint {
    pub version: String,
    pub total: u64,
}

/// Stable versions joined with their download totals, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReconciledSeries {
    pub points: Vec<VersionDownloadPoint>,
}

impl ReconciledSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.version.as_str())
    }

    pub fn totals(&self) -> impl Iterator<Item = u64> + '_ {
        self.points.iter().map(|p| p.total)
    }

    /// Sum of the downloads in the series, saturating on overflow
    pub fn sum(&self) -> u64 {
        self.totals().fold(0u64, u64::saturating_add)
    }

    pub fn max(&self) -> u64 {
        self.totals().max().unwrap_or(0)
    }
}

/// Entry of the search endpoint's result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSuggestion {
    pub name: String,
    pub description: String,
    pub version: String,
}

/// Raw counts reported by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryCounts {
    pub total_packages: u64,
    pub daily_downloads: u64,
}

/// Bundle and install size of the latest published version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BundleSize {
    pub size: Option<u64>,
    pub gzip: Option<u64>,
    pub dependency_count: Option<u64>,
    pub install_size: Option<u64>,
    pub publish_size: Option<u64>,
}

/// A JSON object, or any other value read in its place
#[derive(Deserialize)]
#[serde(untagged)]
enum ObjectOr<T> {
    Object(T),
    Other(#[allow(dead_code)] IgnoredAny),
}

impl<T: Default> ObjectOr<T> {
    fn into_object(self) -> T {
        match self {
            ObjectOr::Object(object) => object,
            ObjectOr::Other(_) => T::default(),
        }
    }
}

/// Dependency map keeping only `name: "range"` string entries
fn lenient_dependencies<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = ObjectOr::<IndexMap<String, Value>>::deserialize(deserializer)?.into_object();
    Ok(map
        .into_iter()
        .filter_map(|(name, range)| match range {
            Value::String(range) => Some((name, range)),
            _ => None,
        })
        .collect())
}

/// Version manifests, with a malformed manifest read as an empty one
fn lenient_manifests<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, VersionManifest>, D::Error>
where
    D: Deserializer<'de>,
{
    let map =
        ObjectOr::<IndexMap<String, ObjectOr<VersionManifest>>>::deserialize(deserializer)?
            .into_object();
    Ok(map
        .into_iter()
        .map(|(version, manifest)| (version, manifest.into_object()))
        .collect())
}

fn lenient_download_record<'de, D>(deserializer: D) -> Result<DownloadRecord, D::Error>
where
    D: Deserializer<'de>,
{
    let map = ObjectOr::<IndexMap<String, Value>>::deserialize(deserializer)?.into_object();
    Ok(map
        .into_iter()
        .filter(|(_, entry)| entry.is_object())
        .map(|(version, entry)| (version, VersionDownloads::from(entry)))
        .collect())
}

pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

pub(crate) fn count_from_value(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f.round() as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn package_metadata_parses_registry_document() {
        let metadata: PackageMetadata = serde_json::from_value(json!({
            "name": "lodash",
            "description": "Lodash modular utilities.",
            "dist-tags": { "latest": "4.17.21" },
            "versions": {
                "4.17.21": { "dependencies": { "a": "^1.0.0" } }
            },
            "time": {
                "created": "2012-04-23T16:37:11.912Z",
                "4.17.21": "2021-02-20T15:42:16.891Z",
                "unpublished": { "time": "2021-02-21T00:00:00.000Z" }
            },
            "author": { "name": "John-David Dalton", "email": "x@y.z" },
            "maintainers": [{ "name": "jdalton" }],
            "license": "MIT",
            "repository": { "type": "git", "url": "git+https://github.com/lodash/lodash.git" },
            "keywords": ["modules", "stdlib"]
        }))
        .unwrap();

        assert_eq!(metadata.name, "lodash");
        assert_eq!(metadata.dist_tags.get("latest").unwrap(), "4.17.21");
        assert_eq!(
            metadata.versions["4.17.21"].dependencies.get("a").unwrap(),
            "^1.0.0"
        );
        assert_eq!(metadata.time.len(), 3);
        assert_eq!(
            metadata.author.unwrap().name(),
            Some("John-David Dalton")
        );
        assert_eq!(metadata.license.unwrap().as_str(), Some("MIT"));
        assert_eq!(
            metadata.repository.unwrap().url(),
            Some("git+https://github.com/lodash/lodash.git")
        );
    }

    #[test]
    fn package_metadata_tolerates_missing_fields() {
        let metadata: PackageMetadata = serde_json::from_value(json!({ "name": "bare" })).unwrap();

        assert!(metadata.time.is_empty());
        assert!(metadata.versions.is_empty());
        assert!(metadata.author.is_none());
    }

    #[rstest]
    #[case(json!("Sindre Sorhus <sindresorhus@gmail.com>"), Some("Sindre Sorhus"))]
    #[case(json!({ "name": "TJ" }), Some("TJ"))]
    #[case(json!({ "email": "a@b.c" }), None)]
    #[case(json!(""), None)]
    fn person_name_handles_both_forms(#[case] value: Value, #[case] expected: Option<&str>) {
        let person: Person = serde_json::from_value(value).unwrap();
        assert_eq!(person.name(), expected);
    }

    #[test]
    fn download_stats_reads_version_totals() {
        let stats: DownloadStats = serde_json::from_value(json!({
            "total": 1500,
            "versions": {
                "1.0.0": { "total": 1000, "dates": {} },
                "0.9.0": { "total": 500.0 },
                "0.8.0": { "total": "many" },
                "0.7.0": {}
            }
        }))
        .unwrap();

        assert_eq!(stats.total, Some(1500));
        assert_eq!(stats.versions["1.0.0"].total, Some(1000));
        assert_eq!(stats.versions["0.9.0"].total, Some(500));
        assert_eq!(stats.versions["0.8.0"].total, None);
        assert_eq!(stats.versions["0.7.0"].total, None);
    }

    #[test]
    fn package_metadata_tolerates_malformed_old_manifests() {
        let metadata: PackageMetadata = serde_json::from_value(json!({
            "name": "old-timer",
            "versions": {
                "0.0.1": { "dependencies": [] },
                "0.0.2": { "dependencies": null, "devDependencies": "none" },
                "0.0.3": null,
                "1.0.0": {
                    "dependencies": { "a": "^1.0.0", "b": { "version": "1" } },
                    "peerDependencies": { "react": ">=16" }
                }
            }
        }))
        .unwrap();

        assert_eq!(
            metadata.versions.keys().collect::<Vec<_>>(),
            vec!["0.0.1", "0.0.2", "0.0.3", "1.0.0"]
        );
        assert!(metadata.versions["0.0.1"].dependencies.is_empty());
        assert!(metadata.versions["0.0.2"].dev_dependencies.is_empty());
        assert_eq!(metadata.versions["0.0.3"], VersionManifest::default());

        let latest = &metadata.versions["1.0.0"];
        assert_eq!(latest.dependencies.len(), 1);
        assert_eq!(latest.dependencies["a"], "^1.0.0");
        assert_eq!(latest.peer_dependencies["react"], ">=16");
    }

    #[test]
    fn download_stats_skips_non_object_entries() {
        let stats: DownloadStats = serde_json::from_value(json!({
            "total": 5,
            "versions": {
                "1.0.0": null,
                "1.1.0": 12,
                "1.2.0": {},
                "2.0.0": { "total": 5 }
            }
        }))
        .unwrap();

        assert_eq!(
            stats.versions.keys().collect::<Vec<_>>(),
            vec!["1.2.0", "2.0.0"]
        );
        assert_eq!(stats.versions["1.2.0"].total, None);

        let stats: DownloadStats =
            serde_json::from_value(json!({ "total": 0, "versions": null })).unwrap();
        assert!(stats.versions.is_empty());
    }

    #[test]
    fn keywords_single_string_is_split() {
        let keywords: Keywords = serde_json::from_value(json!("http, client")).unwrap();
        assert_eq!(keywords.into_vec(), vec!["http", "client"]);
    }

    #[test]
    fn reconciled_series_sum_and_max() {
        let series = ReconciledSeries {
            points: vec![
                VersionDownloadPoint {
                    version: "2.0.0".to_string(),
                    total: 30,
                },
                VersionDownloadPoint {
                    version: "1.0.0".to_string(),
                    total: 70,
                },
            ],
        };

        assert_eq!(series.sum(), 100);
        assert_eq!(series.max(), 70);
        assert_eq!(series.labels().collect::<Vec<_>>(), vec!["2.0.0", "1.0.0"]);
    }
}
