//! History Store — append-only archive of finalized assessments.
//!
//! Entries are immutable once written and the archived record is a deep
//! copy, never shared with the live session. Append-only: there is no
//! update or delete-by-id, only append/list/clear-all.

pub mod handlers;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assessment::record::AssessmentRecord;
use crate::errors::AppError;
use crate::storage::{KvStore, HISTORY_KEY};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation time in epoch milliseconds. Unique in practice: appends
    /// are user-driven and millisecond-spaced.
    pub id: i64,
    /// Display name copied from personalInfo at save time.
    pub name: String,
    pub date: DateTime<Utc>,
    pub data: AssessmentRecord,
}

pub struct HistoryStore {
    store: Arc<dyn KvStore>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// All archived entries in insertion (chronological) order. An
    /// absent or malformed blob reads as an empty history.
    pub fn list(&self) -> Vec<HistoryEntry> {
        let text = match self.store.read(HISTORY_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read history: {e:#}");
                return Vec::new();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("History blob is malformed, treating as empty: {e}");
            Vec::new()
        })
    }

    /// Appends a frozen copy of `record` under `name` and persists the
    /// full sequence synchronously. Returns `false` without writing when
    /// `name` is empty — an unnamed assessment is not archivable.
    pub fn append(&self, name: &str, record: &AssessmentRecord) -> Result<bool, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let mut entries = self.list();
        let now = Utc::now();
        entries.push(HistoryEntry {
            id: now.timestamp_millis(),
            name: name.to_string(),
            date: now,
            data: record.clone(),
        });

        let text = serde_json::to_string(&entries)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize history: {e}")))?;
        self.store
            .write(HISTORY_KEY, &text)
            .map_err(AppError::Storage)?;
        Ok(true)
    }

    /// Removes the history blob entirely.
    pub fn clear(&self) -> Result<(), AppError> {
        self.store.remove(HISTORY_KEY).map_err(AppError::Storage)
    }
}
