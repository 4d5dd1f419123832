//! Theme preference, read once at startup.

use serde::{Deserialize, Serialize};

use stockroom_infra::{KeyValueStore, StorageResult};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// `"dark"` is dark; anything else, or nothing, is light.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

pub fn load_theme(storage: &impl KeyValueStore) -> Theme {
    match storage.get(THEME_KEY) {
        Ok(value) => Theme::from_stored(value.as_deref()),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read theme preference; using light");
            Theme::Light
        }
    }
}

pub fn save_theme(storage: &impl KeyValueStore, theme: Theme) -> StorageResult<()> {
    storage.set(THEME_KEY, theme.as_str())
}
