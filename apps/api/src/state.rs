use std::sync::{Arc, Mutex};

use crate::assessment::session::AssessmentSession;
use crate::assessment::wizard::Wizard;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::report::handlers::ReportSlot;
use crate::report::ReportGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The session and wizard locks are held only for synchronous work —
/// debounced persistence runs on spawned tasks, never under a lock.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<AssessmentSession>>,
    pub wizard: Arc<Mutex<Wizard>>,
    pub history: Arc<HistoryStore>,
    /// Report generation slot: at most one outstanding request, last
    /// result preserved across failures.
    pub reports: Arc<Mutex<ReportSlot>>,
    /// Pluggable generator. Default: `TemplateGenerator`. Swapped for
    /// `LlmGenerator` when ANTHROPIC_API_KEY is set.
    pub generator: Arc<dyn ReportGenerator>,
    pub config: Config,
}
