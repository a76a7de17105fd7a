mod assist;
mod config;
mod cover_letter;
mod db;
mod errors;
mod insights;
mod interview;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;
mod users;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::JobScheduler;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::cover_letter::store::PgCoverLetterStore;
use crate::db::{close_pool, create_pool};
use crate::insights::scheduler::{start_scheduler, RefreshJob};
use crate::insights::store::{InsightStore, PgInsightStore};
use crate::interview::store::PgAssessmentStore;
use crate::llm_client::{GeminiClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::users::auth::SessionVerifier;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerGenius API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize AI client
    let gemini = GeminiClient::new(config.gemini_api_key.clone(), config.ai_timeout)?;
    if gemini.is_configured() {
        info!("AI client initialized (model: {})", config.gemini_model);
    } else {
        warn!("AI API key not configured; all AI features will serve fallback content");
    }
    let ai: Arc<dyn TextGenerator> = Arc::new(gemini);

    let insights: Arc<dyn InsightStore> = Arc::new(PgInsightStore::new(db.clone()));
    let sessions = SessionVerifier::new(&config.auth_jwt_secret, config.auth_issuer.as_deref());

    // Weekly insight refresh
    let mut scheduler = if config.refresh.enabled {
        let job = RefreshJob::new(
            insights.clone(),
            ai.clone(),
            config.gemini_model.clone(),
            config.refresh.concurrency,
            config.refresh.retries,
        );
        Some(start_scheduler(Arc::new(job), &config.refresh.cron).await?)
    } else {
        info!("Insight refresh scheduler disabled");
        None
    };

    let state = AppState {
        db: db.clone(),
        ai,
        insights,
        assessments: Arc::new(PgAssessmentStore::new(db.clone())),
        cover_letters: Arc::new(PgCoverLetterStore::new(db.clone())),
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler.as_mut() {
        stop_scheduler(scheduler).await;
    }
    close_pool(&db).await;

    info!("Shutdown complete");
    Ok(())
}

async fn stop_scheduler(scheduler: &mut JobScheduler) {
    if let Err(e) = scheduler.shutdown().await {
        warn!("Failed to stop insight refresh scheduler: {e}");
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
