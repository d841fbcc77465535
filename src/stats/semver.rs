use std::cmp::Ordering;

use semver::Version;

/// Keys of the registry `time` map that are not versions
pub const METADATA_TIME_KEYS: [&str; 2] = ["created", "modified"];

/// Substrings marking a version as a pre-release
const PRERELEASE_MARKERS: [&str; 3] = ["-", "alpha", "beta"];

/// The major, minor and patch components of a version string.
///
/// Parsing never fails: each of the first three dot-separated tokens is read
/// as its leading decimal digits, and a token without any (or a missing
/// token) counts as zero. Anything after the third token is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTriplet {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionTriplet {
    pub fn parse(version: &str) -> Self {
        let mut tokens = version.split('.').map(parse_component);
        Self {
            major: tokens.next().unwrap_or(0),
            minor: tokens.next().unwrap_or(0),
            patch: tokens.next().unwrap_or(0),
        }
    }
}

/// Leading decimal digits of `token`, or 0
fn parse_component(token: &str) -> u64 {
    let token = token.trim_start();
    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    token[..digits_end].parse().unwrap_or(0)
}

/// Returns true if the version carries no pre-release marker
pub fn is_stable(version: &str) -> bool {
    !PRERELEASE_MARKERS
        .iter()
        .any(|marker| version.contains(marker))
}

/// Returns true for the `created` / `modified` keys of the `time` map
pub fn is_metadata_key(key: &str) -> bool {
    METADATA_TIME_KEYS.contains(&key)
}

/// Orders versions newest first by their triplets
pub fn compare_descending(a: &str, b: &str) -> Ordering {
    VersionTriplet::parse(b).cmp(&VersionTriplet::parse(a))
}

/// Find the semantically maximum stable version from a list
///
/// Versions that are not valid semver, or that are pre-releases, are skipped.
pub fn find_stable_max<'a, I>(versions: I) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    versions
        .into_iter()
        .filter(|v| is_stable(v))
        .filter_map(|v| Version::parse(v).ok().map(|parsed| (v, parsed)))
        .max_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(original, _)| original.clone())
}
