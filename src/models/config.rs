use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::db::ConnectionOptions;

/// Prefix of environment variables overriding file settings, e.g.
/// `PRESS_DATABASE_URL` or `PRESS_LISTING__HOT_ARTICLES`.
pub const ENV_PREFIX: &str = "PRESS";

/// Configuration options specific to the Press service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Path of the SQLite database file.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// How long a connection waits for the SQLite write lock.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Limits of the sidebar listings printed by `press-report`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub archive_months: usize,
    pub hot_articles: usize,
    pub hot_tags: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            archive_months: 12,
            hot_articles: 3,
            hot_tags: 10,
        }
    }
}

fn default_database_url() -> String {
    "press.db".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl ServerConfig {
    /// Loads the optional settings file `path` (extension resolved by the
    /// `config` crate) and layers `PRESS_*` environment variables on top.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            ..ConnectionOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ServerConfig::load("does/not/exist/settings").unwrap();
        assert_eq!(config.pool_size, 10);
        assert_eq!(config.listing.archive_months, 12);
        assert_eq!(
            config.connection_options().busy_timeout,
            Duration::from_millis(config.busy_timeout_ms)
        );
    }

    #[test]
    fn reads_yaml_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(
            &path,
            "database_url: blog.db\nlisting:\n  archive_months: 6\n  hot_articles: 5\n",
        )
        .unwrap();

        let config = ServerConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.listing.archive_months, 6);
        assert_eq!(config.listing.hot_articles, 5);
        assert_eq!(config.listing.hot_tags, 10);
    }
}
