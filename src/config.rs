use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

// =============================================================================
// Defaults
// =============================================================================

/// Timeout for a single HTTP request in milliseconds (10 seconds)
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Number of most recent stable versions kept in the chart
pub const DEFAULT_VERSION_LIMIT: usize = 10;

/// Number of suggestions requested from the search endpoint
pub const DEFAULT_SEARCH_SIZE: usize = 5;

/// Queries shorter than this never hit the search endpoint
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Width of the longest bar in bar and pie charts
pub const DEFAULT_CHART_WIDTH: usize = 40;

pub const DEFAULT_USER_AGENT: &str = "npm-visualizer";

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";
pub const DEFAULT_DOWNLOADS_API_URL: &str = "https://api.npmjs.org";
pub const DEFAULT_JSDELIVR_URL: &str = "https://data.jsdelivr.com";
pub const DEFAULT_BUNDLEPHOBIA_URL: &str = "https://bundlephobia.com";
pub const DEFAULT_PACKAGEPHOBIA_URL: &str = "https://packagephobia.com";

const APP_DIR: &str = "npm-visualizer";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub endpoints: EndpointsConfig,
    pub http: HttpConfig,
    pub chart: ChartConfig,
    pub search: SearchConfig,
    pub log: LogConfig,
}

/// Base URLs of the remote APIs
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointsConfig {
    pub registry: String,
    pub downloads_api: String,
    pub jsdelivr: String,
    pub bundlephobia: String,
    pub packagephobia: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY_URL.to_string(),
            downloads_api: DEFAULT_DOWNLOADS_API_URL.to_string(),
            jsdelivr: DEFAULT_JSDELIVR_URL.to_string(),
            bundlephobia: DEFAULT_BUNDLEPHOBIA_URL.to_string(),
            packagephobia: DEFAULT_PACKAGEPHOBIA_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpConfig {
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub version_limit: usize,
    pub kind: ChartKind,
    pub width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            version_limit: DEFAULT_VERSION_LIMIT,
            kind: ChartKind::default(),
            width: DEFAULT_CHART_WIDTH,
        }
    }
}

/// Chart style used for the downloads-by-version series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Pie,
    None,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    pub size: usize,
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SEARCH_SIZE,
            min_query_len: MIN_SEARCH_QUERY_LEN,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// Filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Write log lines as JSON objects
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default config file is
    /// read when present and the built-in defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    debug!("No config file at {:?}, using defaults", default_path);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the data directory for npm-visualizer.
/// Uses $XDG_DATA_HOME/npm-visualizer if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/npm-visualizer,
/// or ./npm-visualizer if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("npm-visualizer.log")
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
        .join("config.json")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_DIR)
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join(APP_DIR)
}
