//! Configuration management for the pawfetch application.
//!
//! Loads configuration from environment variables with sensible defaults.

use pawfetch_catalog::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};
use pawfetch_runtime::StoreConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog API configuration
    pub api: ApiConfig,
    /// Local storage configuration
    pub storage: StorageConfig,
    /// Runtime configuration
    pub runtime: RuntimeConfig,
}

/// Catalog API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the catalog API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Results per page
    pub page_size: u32,
}

/// Local storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the persisted key-value pairs
    pub path: PathBuf,
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Seconds to wait for in-flight effects on shutdown
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unparseable numbers fall back to their defaults. A page size of zero
    /// is raised to one.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig {
                base_url: env::var("PAWFETCH_API_URL")
                    .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
                request_timeout_secs: env::var("PAWFETCH_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
                page_size: env::var("PAWFETCH_PAGE_SIZE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_PAGE_SIZE)
                    .max(1),
            },
            storage: StorageConfig {
                path: env::var("PAWFETCH_STORAGE_PATH")
                    .map_or_else(|_| PathBuf::from("pawfetch-storage.json"), PathBuf::from),
            },
            runtime: RuntimeConfig {
                shutdown_timeout_secs: env::var("PAWFETCH_SHUTDOWN_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
        }
    }

    /// Per-request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Graceful shutdown timeout
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.runtime.shutdown_timeout_secs)
    }

    /// Store runtime settings
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.shutdown_timeout())
    }
}

/// Load `.env` from the working directory or its parents, if one exists.
///
/// Returns the loaded file's path. A missing or unreadable file is not an
/// error; the process environment is used as is.
#[must_use]
pub fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load environment variables from `path`, returning whether it was read
#[must_use]
pub fn load_env_file_from(path: &Path) -> bool {
    dotenvy::from_path(path).is_ok()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                request_timeout_secs: 10,
                page_size: DEFAULT_PAGE_SIZE,
            },
            storage: StorageConfig {
                path: PathBuf::from("pawfetch-storage.json"),
            },
            runtime: RuntimeConfig {
                shutdown_timeout_secs: 30,
            },
        }
    }
}
