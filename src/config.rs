use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "devops_logs";
pub const DEFAULT_COLLECTION: &str = "logs";
pub const DEFAULT_INTERVAL_MS: u64 = 2_000;

pub const ENV_MONGO_URI: &str = "LOG_EMITTER_MONGO_URI";
pub const ENV_DATABASE: &str = "LOG_EMITTER_DATABASE";
pub const ENV_COLLECTION: &str = "LOG_EMITTER_COLLECTION";
pub const ENV_INTERVAL_MS: &str = "LOG_EMITTER_INTERVAL_MS";
pub const ENV_SEED: &str = "LOG_EMITTER_SEED";
pub const ENV_SERVER_SELECTION_TIMEOUT_MS: &str = "LOG_EMITTER_SERVER_SELECTION_TIMEOUT_MS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer (positive for the interval), got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

/// Where records go and how often. Defaults are the fixed demo target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    pub mongo_uri: String,
    pub database: String,
    pub collection: String,
    pub interval: Duration,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Driver default (30s) when unset.
    pub server_selection_timeout: Option<Duration>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            seed: None,
            server_selection_timeout: None,
        }
    }
}

impl EmitterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key source. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(uri) = lookup(ENV_MONGO_URI) {
            cfg.mongo_uri = non_empty(ENV_MONGO_URI, uri)?;
        }
        if let Some(db) = lookup(ENV_DATABASE) {
            cfg.database = non_empty(ENV_DATABASE, db)?;
        }
        if let Some(coll) = lookup(ENV_COLLECTION) {
            cfg.collection = non_empty(ENV_COLLECTION, coll)?;
        }
        if let Some(raw) = lookup(ENV_INTERVAL_MS) {
            // The loop must always be paced
            let ms = parse_u64(ENV_INTERVAL_MS, &raw)?;
            if ms == 0 {
                return Err(ConfigError::InvalidNumber {
                    key: ENV_INTERVAL_MS,
                    value: raw,
                });
            }
            cfg.interval = Duration::from_millis(ms);
        }
        if let Some(raw) = lookup(ENV_SEED) {
            cfg.seed = Some(parse_u64(ENV_SEED, &raw)?);
        }
        if let Some(raw) = lookup(ENV_SERVER_SELECTION_TIMEOUT_MS) {
            let ms = parse_u64(ENV_SERVER_SELECTION_TIMEOUT_MS, &raw)?;
            cfg.server_selection_timeout = Some(Duration::from_millis(ms));
        }

        Ok(cfg)
    }
}

fn non_empty(key: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { key });
    }
    Ok(trimmed.to_string())
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}
