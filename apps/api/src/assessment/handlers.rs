//! Axum route handlers for the Assessment API — the wizard's seam.
//!
//! Advancement is not gated here (the client disables the control when
//! the active step is incomplete), but the progress payload carries
//! everything needed to make that call.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assessment::completion::{
    compute_progress, is_step_complete, ProgressReport, STEP_COUNT,
};
use crate::assessment::record::{AssessmentRecord, SectionData, SectionKey};
use crate::assessment::wizard::{Advance, FIRST_STEP};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentView {
    pub record: AssessmentRecord,
    pub progress: ProgressReport,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub position: u8,
    /// Whether the active step's required fields are filled in — the
    /// client uses this to enable the advance control.
    pub step_complete: bool,
    /// True once the final step has been advanced past: hand off to
    /// report generation.
    pub assessment_complete: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JumpRequest {
    pub step: u8,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/assessment
pub async fn handle_get_assessment(State(state): State<AppState>) -> Json<AssessmentView> {
    let session = state.session.lock().unwrap();
    let record = session.record().clone();
    let progress = compute_progress(&record);
    Json(AssessmentView { record, progress })
}

/// PATCH /api/v1/assessment/sections/:key
///
/// Shallow-merges a partial section update into the live record and
/// schedules the debounced persistence cycle. Returns the refreshed
/// progress so the client can re-render its step indicators.
pub async fn handle_merge_section(
    State(state): State<AppState>,
    Path(key): Path<SectionKey>,
    Json(partial): Json<SectionData>,
) -> Json<ProgressReport> {
    let mut session = state.session.lock().unwrap();
    session.merge_section(key, partial);
    Json(compute_progress(session.record()))
}

/// DELETE /api/v1/assessment
///
/// Starts a new assessment: clears the record (cancelling any pending
/// debounced write), resets the wizard to step 1, and drops any report
/// state belonging to the old record.
pub async fn handle_new_assessment(State(state): State<AppState>) -> StatusCode {
    info!("Starting a new assessment");
    state.session.lock().unwrap().clear();
    state.wizard.lock().unwrap().reset();
    state.reports.lock().unwrap().supersede();
    StatusCode::NO_CONTENT
}

/// GET /api/v1/assessment/progress
pub async fn handle_progress(State(state): State<AppState>) -> Json<ProgressReport> {
    let session = state.session.lock().unwrap();
    Json(compute_progress(session.record()))
}

/// GET /api/v1/assessment/position
pub async fn handle_get_position(State(state): State<AppState>) -> Json<PositionResponse> {
    let position = state.wizard.lock().unwrap().position();
    let step_complete = {
        let session = state.session.lock().unwrap();
        is_step_complete(position, session.record())
    };
    Json(PositionResponse {
        position,
        step_complete,
        assessment_complete: false,
    })
}

/// POST /api/v1/assessment/advance
///
/// Moves forward one step; at step 10 it signals completion instead of
/// incrementing — there is no step 11.
pub async fn handle_advance(State(state): State<AppState>) -> Json<PositionResponse> {
    let (position, assessment_complete) = {
        let mut wizard = state.wizard.lock().unwrap();
        match wizard.advance() {
            Advance::Moved(position) => (position, false),
            Advance::Complete => (wizard.position(), true),
        }
    };
    let step_complete = {
        let session = state.session.lock().unwrap();
        is_step_complete(position, session.record())
    };
    Json(PositionResponse {
        position,
        step_complete,
        assessment_complete,
    })
}

/// POST /api/v1/assessment/retreat
pub async fn handle_retreat(State(state): State<AppState>) -> Json<PositionResponse> {
    let position = state.wizard.lock().unwrap().retreat();
    let step_complete = {
        let session = state.session.lock().unwrap();
        is_step_complete(position, session.record())
    };
    Json(PositionResponse {
        position,
        step_complete,
        assessment_complete: false,
    })
}

/// PUT /api/v1/assessment/position
///
/// Free navigation to any step, incomplete ones included.
pub async fn handle_jump(
    State(state): State<AppState>,
    Json(request): Json<JumpRequest>,
) -> Result<Json<PositionResponse>, AppError> {
    if !(FIRST_STEP..=STEP_COUNT).contains(&request.step) {
        return Err(AppError::Validation(format!(
            "step must be between {FIRST_STEP} and {STEP_COUNT}, got {}",
            request.step
        )));
    }

    state.wizard.lock().unwrap().jump_to(request.step);
    let step_complete = {
        let session = state.session.lock().unwrap();
        is_step_complete(request.step, session.record())
    };
    Ok(Json(PositionResponse {
        position: request.step,
        step_complete,
        assessment_complete: false,
    }))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use serde_json::json;

    use crate::assessment::session::AssessmentSession;
    use crate::assessment::wizard::Wizard;
    use crate::config::Config;
    use crate::history::HistoryStore;
    use crate::report::analysis::TemplateGenerator;
    use crate::report::handlers::ReportSlot;
    use crate::storage::{KvStore, MemoryStore, ASSESSMENT_KEY, STEP_KEY};

    /// Full app state over the in-memory store and template generator.
    pub(crate) fn test_state() -> (AppState, Arc<MemoryStore>) {
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn KvStore> = Arc::clone(&memory) as Arc<dyn KvStore>;
        let session = AssessmentSession::new(Arc::clone(&store), Duration::from_millis(300));
        let wizard = Wizard::new(Arc::clone(&store));
        let state = AppState {
            session: Arc::new(Mutex::new(session)),
            wizard: Arc::new(Mutex::new(wizard)),
            history: Arc::new(HistoryStore::new(store)),
            reports: Arc::new(Mutex::new(ReportSlot::default())),
            generator: Arc::new(TemplateGenerator),
            config: Config {
                data_dir: "./data".into(),
                port: 0,
                debounce_ms: 300,
                report_timeout_secs: 5,
                anthropic_api_key: None,
                rust_log: "info".to_string(),
            },
        };
        (state, memory)
    }

    fn step_one_fields() -> SectionData {
        [
            ("fullName".to_string(), json!("Ana Silva")),
            ("birthDate".to_string(), json!("1990-05-10")),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_merge_reports_progress_and_walks_to_completion() {
        let (state, _) = test_state();

        // Fresh session: step 1 incomplete, nothing filled
        let position = handle_get_position(State(state.clone())).await.0;
        assert_eq!(position.position, 1);
        assert!(!position.step_complete);

        // Filling step 1 makes it complete at 10%
        let progress =
            handle_merge_section(State(state.clone()), Path(SectionKey::PersonalInfo), Json(step_one_fields()))
                .await
                .0;
        assert_eq!(progress.percentage, 10);
        assert!(progress.steps[0].complete);

        // Walk forward: nine moves land on step 10, the tenth signals
        // completion instead of a step 11
        for expected in 2..=10u8 {
            let response = handle_advance(State(state.clone())).await.0;
            assert_eq!(response.position, expected);
            assert!(!response.assessment_complete);
        }
        let response = handle_advance(State(state.clone())).await.0;
        assert_eq!(response.position, 10);
        assert!(response.assessment_complete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jump_rejects_out_of_range_steps() {
        let (state, _) = test_state();
        assert!(handle_jump(State(state.clone()), Json(JumpRequest { step: 0 }))
            .await
            .is_err());
        assert!(handle_jump(State(state.clone()), Json(JumpRequest { step: 11 }))
            .await
            .is_err());

        let response = handle_jump(State(state), Json(JumpRequest { step: 7 }))
            .await
            .unwrap()
            .0;
        assert_eq!(response.position, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_assessment_resets_everything() {
        let (state, store) = test_state();
        handle_merge_section(
            State(state.clone()),
            Path(SectionKey::PersonalInfo),
            Json(step_one_fields()),
        )
        .await;
        handle_advance(State(state.clone())).await;
        assert!(store.read(STEP_KEY).unwrap().is_some());

        handle_new_assessment(State(state.clone())).await;

        let view = handle_get_assessment(State(state.clone())).await.0;
        assert!(view.record.is_empty());
        assert_eq!(view.progress.percentage, 0);
        assert_eq!(handle_get_position(State(state)).await.0.position, 1);
        assert!(store.read(STEP_KEY).unwrap().is_none());

        // The aborted debounced write must not resurrect the blob
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(store.read(ASSESSMENT_KEY).unwrap().is_none());
    }
}
