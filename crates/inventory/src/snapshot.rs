//! Backup envelope and backup staleness.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::record::ProductRecord;

/// Format version written into every export.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// A backup older than this triggers a warning.
pub const BACKUP_STALE_AFTER_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub version: String,
    pub app_name: String,
    pub export_date: DateTime<Utc>,
    pub total_items: usize,
}

/// Export envelope: `{ metadata, items }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub items: Vec<ProductRecord>,
}

impl Snapshot {
    pub fn new(app_name: impl Into<String>, items: Vec<ProductRecord>, now: DateTime<Utc>) -> Self {
        Self {
            metadata: SnapshotMetadata {
                version: SNAPSHOT_VERSION.to_string(),
                app_name: app_name.into(),
                export_date: now,
                total_items: items.len(),
            },
            items,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// `inventario_YYYY-MM-DD.json`, dated by the export time.
    pub fn file_name(&self) -> String {
        format!("inventario_{}.json", self.metadata.export_date.format("%Y-%m-%d"))
    }
}

/// How recent the last backup is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackupStatus {
    Never,
    Fresh { last: DateTime<Utc> },
    Stale { last: DateTime<Utc>, days: i64 },
}

impl BackupStatus {
    pub fn evaluate(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match last {
            None => Self::Never,
            Some(last) => {
                let age = now.signed_duration_since(last);
                if age > Duration::days(BACKUP_STALE_AFTER_DAYS) {
                    Self::Stale {
                        last,
                        days: age.num_days(),
                    }
                } else {
                    Self::Fresh { last }
                }
            }
        }
    }

    pub fn needs_warning(&self) -> bool {
        !matches!(self, Self::Fresh { .. })
    }
}
