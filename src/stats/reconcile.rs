//! Joins publish times with download statistics into the chart series

use tracing::debug;

use crate::stats::semver::{compare_descending, is_metadata_key, is_stable};
use crate::stats::types::{
    DownloadRecord, ReconciledSeries, VersionDownloadPoint, VersionTimestamps,
};

/// Build the downloads-by-version series for the newest stable versions.
///
/// Takes the versions of `timestamps` (minus the `created` / `modified`
/// keys and any pre-release), orders them newest first, keeps the first
/// `limit` and pairs each with its total from `downloads`. Selected versions
/// without a download record are left out, so the series can be shorter
/// than `limit`. A record without a numeric total counts as 0.
///
/// Versions with equal triplets keep the order they have in `timestamps`.
pub fn reconcile(
    timestamps: &VersionTimestamps,
    downloads: &DownloadRecord,
    limit: usize,
) -> ReconciledSeries {
    let mut versions: Vec<&str> = timestamps
        .keys()
        .map(String::as_str)
        .filter(|key| !is_metadata_key(key))
        .filter(|version| is_stable(version))
        .collect();

    versions.sort_by(|a, b| compare_descending(a, b));
    versions.truncate(limit);

    let points: Vec<VersionDownloadPoint> = versions
        .into_iter()
        .filter_map(|version| {
            downloads.get(version).map(|record| VersionDownloadPoint {
                version: version.to_string(),
                total: record.total.unwrap_or(0),
            })
        })
        .collect();

    debug!(
        "Reconciled {} of {} timestamp entries (limit {})",
        points.len(),
        timestamps.len(),
        limit
    );

    ReconciledSeries { points }
}
