//! Runtime configuration.
//!
//! Defaults are overridden by `RANKVAULT_*` environment variables (the CLI
//! loads an optional `.env` first), and finally by command-line flags.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{ExError, ExErrorKind, Result};
use crate::logging_facility::Profile;
use crate::session::DEFAULT_PAGE_SIZE;

pub const ENV_DB_PATH: &str = "RANKVAULT_DB";
pub const ENV_PAGE_SIZE: &str = "RANKVAULT_PAGE_SIZE";
pub const ENV_LOG_PROFILE: &str = "RANKVAULT_LOG_PROFILE";
pub const ENV_SOURCE_URL: &str = "RANKVAULT_SOURCE_URL";
pub const ENV_PAGE_DELAY_MS: &str = "RANKVAULT_PAGE_DELAY_MS";
pub const ENV_PARTITION_DELAY_MS: &str = "RANKVAULT_PARTITION_DELAY_MS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "RANKVAULT_REQUEST_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "RANKVAULT_USER_AGENT";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub database_path: PathBuf,
    pub page_size: u32,
    pub log_profile: Profile,
    pub source: SourceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(".rankvault/leaderboard.db"),
            page_size: DEFAULT_PAGE_SIZE,
            log_profile: Profile::Development,
            source: SourceConfig::default(),
        }
    }
}

/// Upstream leaderboard API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    /// Pause between page requests within one partition
    pub page_delay: Duration,
    /// Pause between partitions within one run
    pub partition_delay: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hearthstone.blizzard.com/en-us/api/community/leaderboardsData"
                .to_string(),
            page_delay: Duration::from_secs(1),
            partition_delay: Duration::from_secs(2),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("rankvault/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Build from process environment on top of defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup on top of defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup(ENV_DB_PATH) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            let page_size: u32 = parse_number(ENV_PAGE_SIZE, &raw)?;
            if page_size == 0 {
                return Err(invalid(ENV_PAGE_SIZE, &raw));
            }
            config.page_size = page_size;
        }
        if let Some(raw) = lookup(ENV_LOG_PROFILE) {
            config.log_profile =
                Profile::parse(&raw).ok_or_else(|| invalid(ENV_LOG_PROFILE, &raw))?;
        }
        if let Some(url) = lookup(ENV_SOURCE_URL) {
            config.source.base_url = url;
        }
        if let Some(raw) = lookup(ENV_PAGE_DELAY_MS) {
            config.source.page_delay = Duration::from_millis(parse_number(ENV_PAGE_DELAY_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_PARTITION_DELAY_MS) {
            config.source.partition_delay =
                Duration::from_millis(parse_number(ENV_PARTITION_DELAY_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.source.request_timeout =
                Duration::from_secs(parse_number(ENV_REQUEST_TIMEOUT_SECS, &raw)?);
        }
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            config.source.user_agent = agent;
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| invalid(key, raw))
}

fn invalid(key: &str, raw: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_config")
        .with_entity_id(key)
        .with_message(format!("invalid value '{}'", raw))
}
