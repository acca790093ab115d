//! Configuration loading and management

use crate::core::query::{DEFAULT_PAGE_SIZE, DEFAULT_SORT_SAFELIST, Filters, MAX_PAGE_SIZE};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Reported by the healthcheck endpoint
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            environment: "development".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database pool and per-call limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string. Without one the in-memory store is used.
    pub dsn: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_idle_time_secs: u64,
    /// Time budget for every store call
    pub query_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            max_connections: 25,
            min_connections: 0,
            max_idle_time_secs: 900,
            query_timeout_secs: 3,
        }
    }
}

impl DatabaseConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

/// Defaults for the list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub default_page_size: i64,
    pub sort_safelist: Vec<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            sort_safelist: DEFAULT_SORT_SAFELIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ListingConfig {
    /// Filters for a request that supplied no paging or sort parameters.
    pub fn default_filters(&self) -> Filters {
        Filters {
            page: 1,
            page_size: self.default_page_size,
            sort: "id".to_string(),
            sort_safelist: self.sort_safelist.clone(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub listing: ListingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `EDTOYS_DB_DSN` and `EDTOYS_PORT` when set
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        self.apply_overrides(
            std::env::var("EDTOYS_DB_DSN").ok(),
            std::env::var("EDTOYS_PORT").ok(),
        )?;
        Ok(self)
    }

    fn apply_overrides(&mut self, dsn: Option<String>, port: Option<String>) -> Result<()> {
        if let Some(dsn) = dsn.filter(|d| !d.is_empty()) {
            self.database.dsn = Some(dsn);
        }
        if let Some(port) = port {
            self.server.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid EDTOYS_PORT '{}': {}", port, e))?;
        }
        self.validate()
    }

    /// Reject settings the store and list endpoint cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.database.query_timeout_secs == 0 {
            bail!("database.query_timeout_secs must be greater than zero");
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.listing.default_page_size) {
            bail!("listing.default_page_size must be between 1 and {}", MAX_PAGE_SIZE);
        }
        if self.listing.sort_safelist.is_empty() {
            bail!("listing.sort_safelist must not be empty");
        }
        Ok(())
    }
}
