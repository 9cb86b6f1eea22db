//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MAILCOLLECT_CONFIG` (environment variable)
//! 2. `~/.config/mailcollect/config.toml` (Linux/macOS)
//!    `%APPDATA%\mailcollect\config.toml` (Windows)
//! 3. Built-in defaults

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::export::{OutputFormat, DEFAULT_OUTPUT_DIR};
use crate::graph::client::DEFAULT_BASE_URL;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Export defaults.
    pub export: ExportConfig,
    /// Mail service connection.
    pub graph: GraphConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Export defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default message format: "eml" or "txt".
    pub default_format: OutputFormat,
    /// Directory used when no `--output` is given. Created if missing.
    pub default_output_dir: PathBuf,
}

/// Mail service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// API root, e.g. `https://graph.microsoft.com/v1.0`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Bearer token. Prefer `MAILCOLLECT_ACCESS_TOKEN` over storing it here.
    pub access_token: Option<String>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Eml,
            default_output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            access_token: None,
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    match config_file_path() {
        Some(path) => load_config_from(&path),
        None => Config::default(),
    }
}

/// Load configuration from `path`, falling back to defaults.
///
/// A missing file is silent; unreadable or malformed files are logged.
pub fn load_config_from(path: &Path) -> Config {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Config::default(),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to read config file, using defaults"
            );
            return Config::default();
        }
    };

    match toml::from_str::<Config>(&contents) {
        Ok(cfg) => {
            tracing::info!(path = %path.display(), "Loaded config");
            cfg
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to parse config, using defaults"
            );
            Config::default()
        }
    }
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MAILCOLLECT_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("mailcollect").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailcollect")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join(LOG_FILE_NAME)
}

/// Name of the collection log inside the cache directory.
pub const LOG_FILE_NAME: &str = "mailcollect.log";
