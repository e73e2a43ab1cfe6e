//! Axum route handlers for the History API.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::info;

use crate::assessment::record::SectionKey;
use crate::errors::AppError;
use crate::history::HistoryEntry;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResponse {
    /// False when the live record has no fullName yet — an unnamed
    /// assessment is not archived.
    pub archived: bool,
    pub entries: Vec<HistoryEntry>,
}

/// GET /api/v1/history
pub async fn handle_list(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.list())
}

/// POST /api/v1/history
///
/// Archives a frozen copy of the live record under the name from
/// personalInfo. The live session is untouched — clearing it afterwards
/// is the client's explicit "start new assessment" action.
pub async fn handle_archive(
    State(state): State<AppState>,
) -> Result<Json<ArchiveResponse>, AppError> {
    let (name, record) = {
        let session = state.session.lock().unwrap();
        let record = session.record().clone();
        let name = record
            .text(SectionKey::PersonalInfo, "fullName")
            .unwrap_or_default()
            .to_string();
        (name, record)
    };

    let archived = state.history.append(&name, &record)?;
    if archived {
        info!("Archived assessment for {name:?}");
    }
    Ok(Json(ArchiveResponse {
        archived,
        entries: state.history.list(),
    }))
}

/// DELETE /api/v1/history
pub async fn handle_clear(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.history.clear()?;
    Ok(StatusCode::NO_CONTENT)
}
