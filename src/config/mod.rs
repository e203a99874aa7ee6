//! Configuration management.
//!
//! All endpoints and secrets are injected: a TOML file, `MAKEUP_EXAM_*`
//! environment variables, or CLI flags. Nothing is hard-coded beyond the
//! development defaults.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "https://exam.example.edu.tw"
//!
//! [admin]
//! upload_url = "https://exam.example.edu.tw/admin/upload"
//! token = "64-hex-char-secret"
//!
//! [server]
//! bind_addr = "127.0.0.1:8000"
//! database = "./makeup_exam.sqlite3"
//! ```
//!
//! Environment overrides use a double underscore for nesting, e.g.
//! `MAKEUP_EXAM_ADMIN__TOKEN`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Student lookup API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Admin upload settings
    #[serde(default)]
    pub admin: AdminConfig,

    /// REST service settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Student lookup API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the lookup client queries (fixed local address in development)
    #[serde(default = "default_api_base")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
        }
    }
}

/// Admin upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Full URL of the admin upload endpoint
    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    /// Shared secret sent in the X-Admin-Token header, obtained out-of-band
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            upload_url: default_upload_url(),
            token: None,
        }
    }
}

/// REST service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the service binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// SQLite database path
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database: default_database(),
        }
    }
}

fn default_api_base() -> String {
    "http://localhost:8000".to_string()
}

fn default_upload_url() -> String {
    "http://localhost:8000/admin/upload".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_database() -> PathBuf {
    PathBuf::from("./makeup_exam.sqlite3")
}

/// Load configuration from a file, with environment overrides applied on top
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("MAKEUP_EXAM").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from environment variables and defaults only
pub fn get_config() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix("MAKEUP_EXAM").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Probe the standard locations for a config file.
///
/// Checked in order: `./makeup-exam.toml`, then
/// `<config dir>/makeup-exam/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("makeup-exam.toml");
    if local.is_file() {
        return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join("makeup-exam").join("config.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}
