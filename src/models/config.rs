//! Process configuration for the tracker binary.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use validator::ValidateUrl;

/// Prefix of environment variables read into [`TrackerConfig`].
pub const ENV_PREFIX: &str = "ROOM_TRACKER";

const DEFAULT_CONFIG_FILE: &str = "config/default";
const DEFAULT_README_PATH: &str = "README.md";

/// Errors raised while loading configuration. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("missing required setting `{0}`")]
    Missing(&'static str),
    #[error("store_url `{0}` is not a valid URL")]
    InvalidStoreUrl(String),
}

/// Raw values as they come out of the layered sources.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    store_url: Option<String>,
    store_key: Option<String>,
    readme_path: Option<PathBuf>,
}

/// Where the checklist data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Hosted REST store reached at the given base URL.
    Rest { base_url: String },
    /// Local SQLite database file.
    Sqlite { database_url: String },
}

/// Configuration options for the tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Endpoint of the store: an `http(s)` URL or a SQLite path.
    pub store_url: String,
    /// Access credential sent to the store.
    pub store_key: String,
    /// Checklist document read by `seed`.
    pub readme_path: PathBuf,
}

impl TrackerConfig {
    /// Load configuration from `.env`, `config/default.yaml` and
    /// `ROOM_TRACKER_*` environment variables, later sources winning.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is fine; the variables may already be exported.
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {e}");
        }

        let settings = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let raw: RawConfig = settings.try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let store_url = required(raw.store_url, "store_url")?;
        let store_key = required(raw.store_key, "store_key")?;
        Ok(Self {
            store_url,
            store_key,
            readme_path: raw
                .readme_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_README_PATH)),
        })
    }

    /// Pick the store implementation from the shape of `store_url`.
    pub fn backend(&self) -> Result<StoreBackend, ConfigError> {
        let url = self.store_url.as_str();
        if url.starts_with("http://") || url.starts_with("https://") {
            if !url.validate_url() {
                return Err(ConfigError::InvalidStoreUrl(url.to_string()));
            }
            return Ok(StoreBackend::Rest {
                base_url: url.trim_end_matches('/').to_string(),
            });
        }

        let database_url = url.strip_prefix("sqlite://").unwrap_or(url);
        Ok(StoreBackend::Sqlite {
            database_url: database_url.to_string(),
        })
    }
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key)),
    }
}
