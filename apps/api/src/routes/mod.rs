pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::history::handlers as history;
use crate::report::handlers as report;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Assessment API
        .route(
            "/api/v1/assessment",
            get(assessment::handle_get_assessment).delete(assessment::handle_new_assessment),
        )
        .route(
            "/api/v1/assessment/sections/:key",
            patch(assessment::handle_merge_section),
        )
        .route(
            "/api/v1/assessment/progress",
            get(assessment::handle_progress),
        )
        .route(
            "/api/v1/assessment/position",
            get(assessment::handle_get_position).put(assessment::handle_jump),
        )
        .route("/api/v1/assessment/advance", post(assessment::handle_advance))
        .route("/api/v1/assessment/retreat", post(assessment::handle_retreat))
        // History API
        .route(
            "/api/v1/history",
            get(history::handle_list)
                .post(history::handle_archive)
                .delete(history::handle_clear),
        )
        // Report API
        .route("/api/v1/reports/generate", post(report::handle_generate))
        .route("/api/v1/reports/current", get(report::handle_current))
        .with_state(state)
}
