//! Autobot - preventive engine-maintenance assistant
//!
//! A Rust backend driving Spanish-language maintenance conversations:
//! canned guides for the main topics and Gemini-generated answers for
//! everything else.

mod api;
mod config;
mod conversation;
mod llm;
mod reference_data;
mod resolver;
mod runtime;
mod state_machine;
mod system_prompt;

use api::{create_router, AppState};
use config::AppConfig;
use llm::ModelRegistry;
use runtime::{RegistryLlmClient, SessionManager};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autobot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };

    // Initialize LLM registry
    let llm_registry = Arc::new(ModelRegistry::new(&config.llm)?);
    tracing::info!(
        models = ?llm_registry.available_models(),
        gateway = config.llm.gateway.is_some(),
        "LLM registry initialized"
    );
    tracing::info!(
        style = ?config.session.style,
        inactivity_secs = config.session.inactivity_timeout.map(|d| d.as_secs()),
        reply_timeout_secs = config.session.reply_timeout.as_secs(),
        max_output_tokens = config.session.max_output_tokens,
        session_idle_secs = config.session_idle.map(|d| d.as_secs()),
        "Session settings"
    );

    // Create application state
    let sessions = SessionManager::new(
        Arc::new(RegistryLlmClient::new(llm_registry)),
        Arc::new(config.reference_data),
        config.session,
    );
    let state = AppState::new(sessions);
    if let Some(idle) = config.session_idle {
        state.sessions.spawn_eviction(idle);
    }

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Autobot server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
