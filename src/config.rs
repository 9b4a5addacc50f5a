use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE: &str = "vtable.db";

/// Settings for `vtable serve`. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub database: String,
    pub cors_origin: Option<String>,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            cors_origin: None,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Defaults overridden by any `VTABLE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(port) = var("VTABLE_PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("VTABLE_PORT is not a valid port: {}", port))?;
        }
        if let Some(database) = var("VTABLE_DATABASE") {
            self.database = database;
        }
        if let Some(origin) = var("VTABLE_CORS_ORIGIN") {
            self.cors_origin = Some(origin);
        }
        if let Some(level) = var("VTABLE_LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(self)
    }
}
