mod assessment;
mod config;
mod errors;
mod history;
mod report;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::session::AssessmentSession;
use crate::assessment::wizard::Wizard;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::report::analysis::TemplateGenerator;
use crate::report::handlers::ReportSlot;
use crate::report::llm::LlmGenerator;
use crate::report::ReportGenerator;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileStore, KvStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("genius_map_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Genius Map API v{}", env!("CARGO_PKG_VERSION"));

    // Key/value store backing the live record, wizard position and history
    let store: Arc<dyn KvStore> = Arc::new(FileStore::new(&config.data_dir)?);

    // Resume the persisted session, if any
    let mut session = AssessmentSession::new(
        Arc::clone(&store),
        Duration::from_millis(config.debounce_ms),
    );
    session.load_from_store();
    let mut wizard = Wizard::new(Arc::clone(&store));
    wizard.load_from_store();
    info!("Session resumed at step {}", wizard.position());

    let history = Arc::new(HistoryStore::new(Arc::clone(&store)));

    // Report generator: templates by default, Claude when a key is set
    let generator: Arc<dyn ReportGenerator> = match config.anthropic_api_key.clone() {
        Some(api_key) => {
            info!("Report generator: LLM (model: {})", report::llm::MODEL);
            Arc::new(LlmGenerator::new(api_key))
        }
        None => {
            info!("Report generator: templates (no ANTHROPIC_API_KEY)");
            Arc::new(TemplateGenerator)
        }
    };

    let state = AppState {
        session: Arc::new(Mutex::new(session)),
        wizard: Arc::new(Mutex::new(wizard)),
        history,
        reports: Arc::new(Mutex::new(ReportSlot::default())),
        generator,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
