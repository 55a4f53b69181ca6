//! Layered configuration for the seeder and the web server.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. `browser.toml` in the working directory
//! 3. `BROWSER_*` environment variables (`__` separates sections, e.g.
//!    `BROWSER_SERVER__PORT=8080`)

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::error::{AppError, Result};
use crate::domain::page::DEFAULT_PAGE_SIZE;

const CONFIG_FILE: &str = "browser.toml";
const ENV_PREFIX: &str = "BROWSER_";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("nfsn.db"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedConfig {
    /// Directory holding the Contoso CSV exports
    pub data_dir: PathBuf,
    /// Rows per insert batch
    pub batch_size: usize,
    /// Field separator of the CSV files
    pub delimiter: char,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("contoso"),
            batch_size: 1000,
            delimiter: ',',
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4567,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            seed: SeedConfig::default(),
            server: ServerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load `.env`, then extract from the full provider chain
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let local_path = PathBuf::from(CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.seed.batch_size == 0 {
            return Err(AppError::ConfigError(
                "seed.batch_size must be at least 1".to_string(),
            ));
        }
        if !self.seed.delimiter.is_ascii() || self.seed.delimiter == '"' {
            return Err(AppError::ConfigError(format!(
                "seed.delimiter must be a single ASCII character other than '\"', got {:?}",
                self.seed.delimiter
            )));
        }
        if self.server.page_size == 0 {
            return Err(AppError::ConfigError(
                "server.page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }

    /// The validated delimiter as the byte the CSV reader expects
    pub fn csv_delimiter(&self) -> u8 {
        self.seed.delimiter as u8
    }
}
