//! Axum route handlers for the Report API.
//!
//! Exactly one generation request may be outstanding; the triggering
//! control stays disabled client-side while one is in flight and the
//! server enforces it with a 409. Each request gets a sequence number:
//! a result arriving for a superseded sequence (timed out, or the
//! session was cleared underneath it) is discarded instead of
//! overwriting newer state. The previous successful report survives any
//! failure, so the retry action has something to fall back on.

use std::time::Duration;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::report::{AnalysisResult, ReportType};
use crate::state::AppState;

/// A successfully generated report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    pub report_type: ReportType,
    pub analysis: AnalysisResult,
    pub generated_at: DateTime<Utc>,
}

/// The single report slot shared across requests.
#[derive(Default)]
pub struct ReportSlot {
    seq: u64,
    in_flight: bool,
    last_report: Option<GeneratedReport>,
    last_error: Option<String>,
}

impl ReportSlot {
    /// Invalidates any outstanding request and drops slot contents.
    /// Called when a new assessment starts: the old record's report (and
    /// any result still in flight for it) no longer applies.
    pub fn supersede(&mut self) {
        self.seq += 1;
        self.in_flight = false;
        self.last_report = None;
        self.last_error = None;
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub report_type: ReportType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatusResponse {
    pub in_flight: bool,
    pub report: Option<GeneratedReport>,
    pub error: Option<String>,
}

/// POST /api/v1/reports/generate
///
/// Runs the generator with a bounded timeout. On success the result is
/// stored and returned; on failure or timeout the slot keeps the prior
/// report and records a retryable error state.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateReportRequest>,
) -> Result<Json<GeneratedReport>, AppError> {
    let record = {
        let session = state.session.lock().unwrap();
        session.record().clone()
    };
    if record.is_empty() {
        return Err(AppError::Validation(
            "The assessment is empty. Fill in at least one step before generating.".to_string(),
        ));
    }

    let my_seq = {
        let mut slot = state.reports.lock().unwrap();
        if slot.in_flight {
            return Err(AppError::GenerationInFlight);
        }
        slot.seq += 1;
        slot.in_flight = true;
        slot.seq
    };

    info!("Generating {:?} report (seq {})", request.report_type, my_seq);

    // The generator runs on its own task so a timed-out handler does not
    // cancel it mid-call; the sequence check below discards its result
    // if it lands late.
    let (tx, rx) = oneshot::channel();
    let generator = state.generator.clone();
    let reports = state.reports.clone();
    let report_type = request.report_type;
    tokio::spawn(async move {
        let outcome = generator.generate(&record, report_type).await;

        let mut slot = reports.lock().unwrap();
        if slot.seq != my_seq {
            warn!("Discarding stale report result (seq {} superseded)", my_seq);
            return;
        }
        slot.in_flight = false;
        let response = match outcome {
            Ok(analysis) => {
                let report = GeneratedReport {
                    report_type,
                    analysis,
                    generated_at: Utc::now(),
                };
                slot.last_report = Some(report.clone());
                slot.last_error = None;
                Ok(report)
            }
            Err(e) => {
                // Prior report is preserved; only the error state changes.
                slot.last_error = Some(e.to_string());
                Err(e)
            }
        };
        let _ = tx.send(response);
    });

    let timeout = Duration::from_secs(state.config.report_timeout_secs);
    match tokio::time::timeout(timeout, rx).await {
        Ok(Ok(Ok(report))) => Ok(Json(report)),
        Ok(Ok(Err(e))) => Err(e),
        // Generator task dropped the channel after a stale-seq discard.
        Ok(Err(_)) => Err(AppError::Generation("Report request was superseded".to_string())),
        Err(_) => {
            let mut slot = state.reports.lock().unwrap();
            if slot.seq == my_seq {
                slot.seq += 1; // supersede: a late result must not land
                slot.in_flight = false;
                slot.last_error = Some("Report generation timed out".to_string());
            }
            Err(AppError::GenerationTimeout)
        }
    }
}

/// GET /api/v1/reports/current
///
/// Last generated report (if any), the last error, and whether a
/// request is outstanding — enough for the client to render its
/// error-with-retry state.
pub async fn handle_current(State(state): State<AppState>) -> Json<ReportStatusResponse> {
    let slot = state.reports.lock().unwrap();
    Json(ReportStatusResponse {
        in_flight: slot.in_flight,
        report: slot.last_report.clone(),
        error: slot.last_error.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::assessment::handlers::tests::test_state;
    use crate::assessment::record::SectionKey;
    use crate::report::{GeniusZone, IdealProfile, Recommendations};

    fn sample_report() -> GeneratedReport {
        GeneratedReport {
            report_type: ReportType::Executive,
            analysis: AnalysisResult {
                genius_zone: GeniusZone {
                    core: "clarity".to_string(),
                    strengths: vec![],
                    opportunities: vec![],
                },
                recommendations: Recommendations {
                    immediate: vec![],
                    strategic: vec![],
                    development: vec![],
                },
                ideal_profile: IdealProfile {
                    role: "strategist".to_string(),
                    environment: "remote".to_string(),
                    conditions: vec![],
                },
                risk_factors: vec![],
                next_steps: vec![],
                career_roadmap: vec![],
                positioning_strategies: vec![],
                development_plan: vec![],
            },
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_supersede_bumps_seq_and_clears_contents() {
        let mut slot = ReportSlot {
            seq: 4,
            in_flight: true,
            last_report: Some(sample_report()),
            last_error: Some("boom".to_string()),
        };
        slot.supersede();
        assert_eq!(slot.seq, 5);
        assert!(!slot.in_flight);
        assert!(slot.last_report.is_none());
        assert!(slot.last_error.is_none());
    }

    #[test]
    fn test_stale_result_is_detected_by_seq_mismatch() {
        let mut slot = ReportSlot::default();
        slot.seq = 1;
        slot.in_flight = true;
        let my_seq = slot.seq;

        // A timeout supersedes the request before the result lands.
        slot.seq += 1;
        slot.in_flight = false;

        assert_ne!(slot.seq, my_seq);
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_assessment() {
        let (state, _) = test_state();
        let result = handle_generate(
            State(state),
            Json(GenerateReportRequest {
                report_type: ReportType::Executive,
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_generate_stores_report_and_current_reflects_it() {
        let (state, _) = test_state();
        state.session.lock().unwrap().merge_section(
            SectionKey::PersonalInfo,
            [
                ("fullName".to_string(), json!("Ana Silva")),
                ("desiredRoles".to_string(), json!(["Product strategist"])),
            ]
            .into_iter()
            .collect(),
        );

        let report = handle_generate(
            State(state.clone()),
            Json(GenerateReportRequest {
                report_type: ReportType::Strategic,
            }),
        )
        .await
        .unwrap()
        .0;
        assert_eq!(report.report_type, ReportType::Strategic);
        assert!(!report.analysis.career_roadmap.is_empty());

        let status = handle_current(State(state)).await.0;
        assert!(!status.in_flight);
        assert!(status.error.is_none());
        let stored = status.report.unwrap();
        assert_eq!(stored.generated_at, report.generated_at);
    }

    #[tokio::test]
    async fn test_generate_returns_conflict_while_in_flight() {
        let (state, _) = test_state();
        state.session.lock().unwrap().merge_section(
            SectionKey::PersonalInfo,
            [("fullName".to_string(), json!("Ana Silva"))].into_iter().collect(),
        );
        state.reports.lock().unwrap().in_flight = true;

        let result = handle_generate(
            State(state),
            Json(GenerateReportRequest {
                report_type: ReportType::Executive,
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::GenerationInFlight)));
    }
}
