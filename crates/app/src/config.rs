//! Configuration from environment variables.

use std::path::PathBuf;

use anyhow::{Context, anyhow};

use stockroom_inventory::{InventoryProfile, ProfileKind};
use stockroom_observability::LogFormat;

pub const ENV_DATA_DIR: &str = "STOCKROOM_DATA_DIR";
pub const ENV_PROFILE: &str = "STOCKROOM_PROFILE";
pub const ENV_LOW_STOCK: &str = "STOCKROOM_LOW_STOCK";
pub const ENV_LOG_FORMAT: &str = "STOCKROOM_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub profile: ProfileKind,
    /// Overrides the profile's own threshold when set.
    pub low_stock_threshold: Option<u64>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./stockroom-data"),
            profile: ProfileKind::BabyStock,
            low_stock_threshold: None,
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(profile) = get(ENV_PROFILE) {
            config.profile = profile
                .parse::<ProfileKind>()
                .with_context(|| format!("invalid {ENV_PROFILE}"))?;
        }
        if let Some(threshold) = get(ENV_LOW_STOCK) {
            let value = threshold
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid {ENV_LOW_STOCK}: {threshold:?}"))?;
            config.low_stock_threshold = Some(value);
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            config.log_format = format
                .parse::<LogFormat>()
                .map_err(|e: String| anyhow!(e))
                .with_context(|| format!("invalid {ENV_LOG_FORMAT}"))?;
        }

        Ok(config)
    }

    pub fn inventory_profile(&self) -> InventoryProfile {
        let profile = InventoryProfile::builtin(self.profile);
        match self.low_stock_threshold {
            Some(threshold) => profile.with_low_stock_threshold(threshold),
            None => profile,
        }
    }
}
