//! Assessment State Manager — the live in-memory record plus debounced
//! persistence to the key-value store.
//!
//! Merges mutate memory immediately; the write to `geniusMapAssessment`
//! is deferred by the debounce window, and a newer merge cancels and
//! replaces the previously scheduled write (latest snapshot wins).
//! `clear()` is the one synchronous path: it cancels any pending write
//! and removes the blob before returning.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::assessment::record::{AssessmentRecord, SectionData, SectionKey};
use crate::storage::{KvStore, ASSESSMENT_KEY};

pub struct AssessmentSession {
    store: Arc<dyn KvStore>,
    record: AssessmentRecord,
    debounce: Duration,
    pending_save: Option<JoinHandle<()>>,
}

impl AssessmentSession {
    pub fn new(store: Arc<dyn KvStore>, debounce: Duration) -> Self {
        Self {
            store,
            record: AssessmentRecord::new(),
            debounce,
            pending_save: None,
        }
    }

    pub fn record(&self) -> &AssessmentRecord {
        &self.record
    }

    /// Populates in-memory state from the store. Called once at startup.
    /// A missing blob is a fresh session; a malformed one is logged and
    /// replaced by the empty default, never raised.
    pub fn load_from_store(&mut self) {
        let text = match self.store.read(ASSESSMENT_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!("No saved assessment — starting empty");
                return;
            }
            Err(e) => {
                warn!("Failed to read saved assessment: {e:#}");
                return;
            }
        };

        match serde_json::from_str(&text) {
            Ok(record) => {
                self.record = record;
                debug!("Loaded saved assessment from store");
            }
            Err(e) => {
                warn!("Saved assessment is malformed, starting empty: {e}");
            }
        }
    }

    /// Shallow-merges a partial section update and reschedules the
    /// debounced persistence cycle.
    pub fn merge_section(&mut self, key: SectionKey, partial: SectionData) {
        self.record.merge_section(key, partial);
        self.schedule_save();
    }

    /// Cancels any pending debounced write, resets the record to empty,
    /// and removes the persisted blob immediately.
    pub fn clear(&mut self) {
        if let Some(pending) = self.pending_save.take() {
            pending.abort();
        }
        self.record = AssessmentRecord::new();
        if let Err(e) = self.store.remove(ASSESSMENT_KEY) {
            warn!("Failed to remove saved assessment: {e:#}");
        }
    }

    fn schedule_save(&mut self) {
        if let Some(pending) = self.pending_save.take() {
            pending.abort();
        }

        // Snapshot now: the task must write what was merged, not what the
        // record looks like when the timer fires.
        let snapshot = match serde_json::to_string(&self.record) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Failed to serialize assessment for save: {e}");
                return;
            }
        };

        let store = Arc::clone(&self.store);
        let delay = self.debounce;
        self.pending_save = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = store.write(ASSESSMENT_KEY, &snapshot) {
                // Loss of persistence is degraded-but-usable.
                warn!("Debounced assessment save failed: {e:#}");
            } else {
                debug!("Assessment persisted ({} bytes)", snapshot.len());
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::storage::MemoryStore;

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn session_with_store() -> (AssessmentSession, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let session = AssessmentSession::new(Arc::clone(&store) as Arc<dyn KvStore>, DEBOUNCE);
        (session, store)
    }

    fn name_fields() -> SectionData {
        [("fullName".to_string(), json!("Ana Silva"))]
            .into_iter()
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_merge_persists_after_debounce_window() {
        let (mut session, store) = session_with_store();
        session.merge_section(SectionKey::PersonalInfo, name_fields());

        // Nothing on disk until the window elapses
        assert!(store.read(ASSESSMENT_KEY).unwrap().is_none());

        tokio::time::sleep(Duration::from_millis(350)).await;
        let saved = store.read(ASSESSMENT_KEY).unwrap().expect("blob saved");
        let parsed: AssessmentRecord = serde_json::from_str(&saved).unwrap();
        assert_eq!(parsed.text(SectionKey::PersonalInfo, "fullName"), Some("Ana Silva"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_merges_save_latest_snapshot_once() {
        let (mut session, store) = session_with_store();
        session.merge_section(SectionKey::PersonalInfo, name_fields());
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.merge_section(
            SectionKey::PersonalInfo,
            [("birthDate".to_string(), json!("1990-05-10"))]
                .into_iter()
                .collect(),
        );

        // First scheduled write was cancelled; 300ms after the second
        // merge both fields land together.
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(store.read(ASSESSMENT_KEY).unwrap().is_none());

        tokio::time::sleep(Duration::from_millis(100)).await;
        let saved = store.read(ASSESSMENT_KEY).unwrap().expect("blob saved");
        let parsed: AssessmentRecord = serde_json::from_str(&saved).unwrap();
        assert_eq!(parsed.text(SectionKey::PersonalInfo, "fullName"), Some("Ana Silva"));
        assert_eq!(
            parsed.text(SectionKey::PersonalInfo, "birthDate"),
            Some("1990-05-10")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_resets_record_and_cancels_pending_write() {
        let (mut session, store) = session_with_store();
        session.merge_section(SectionKey::PersonalInfo, name_fields());
        session.clear();

        assert!(session.record().is_empty());

        // The aborted debounce task must not resurrect the blob.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(store.read(ASSESSMENT_KEY).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_removes_already_persisted_blob() {
        let (mut session, store) = session_with_store();
        session.merge_section(SectionKey::PersonalInfo, name_fields());
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(store.read(ASSESSMENT_KEY).unwrap().is_some());

        session.clear();
        assert!(store.read(ASSESSMENT_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_from_store_round_trip() {
        let store = Arc::new(MemoryStore::new());
        store
            .write(
                ASSESSMENT_KEY,
                r#"{"personalInfo":{"fullName":"Ana Silva","birthDate":"1990-05-10"}}"#,
            )
            .unwrap();

        let mut session = AssessmentSession::new(Arc::clone(&store) as Arc<dyn KvStore>, DEBOUNCE);
        session.load_from_store();
        assert_eq!(
            session.record().text(SectionKey::PersonalInfo, "fullName"),
            Some("Ana Silva")
        );
    }

    #[tokio::test]
    async fn test_load_from_store_tolerates_malformed_blob() {
        let store = Arc::new(MemoryStore::new());
        store.write(ASSESSMENT_KEY, "{not json").unwrap();

        let mut session = AssessmentSession::new(Arc::clone(&store) as Arc<dyn KvStore>, DEBOUNCE);
        session.load_from_store();
        assert!(session.record().is_empty());
    }
}
