pub mod api;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod session;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::{start_dashboard_server, ApiContext, ServerError};
use crate::config::{ConfigError, Settings};
use crate::pipeline::analysis::{AnalysisError, GeminiClient, MeetingAnalyzer};
use crate::session::Session;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to initialise the Gemini client: {0}")]
    Client(#[from] AnalysisError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Startup task failed: {0}")]
    Startup(String),

    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Start the dashboard and serve until Ctrl-C.
pub async fn run() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = Settings::load()?;
    settings.validate()?;
    let addr = settings.socket_addr()?;

    // reqwest's blocking client owns a runtime of its own; build it off ours
    let gemini = settings.gemini.clone();
    let generation = settings.generation.clone();
    let client = tokio::task::spawn_blocking(move || GeminiClient::new(&gemini, &generation))
        .await
        .map_err(|e| AppError::Startup(e.to_string()))??;

    let analyzer = MeetingAnalyzer::new(Box::new(client));
    tracing::info!(model = %analyzer.model_name(), "Gemini client ready");

    let ctx = ApiContext::new(
        Arc::new(Session::new()),
        Arc::new(analyzer),
        settings.chart,
    );

    let mut server = start_dashboard_server(ctx.clone(), addr).await?;
    tracing::info!(url = %server.url(), "Dashboard available");

    let signal = tokio::signal::ctrl_c().await.map_err(AppError::Signal);

    server.shutdown();
    server.wait_stopped().await;

    // Last reference to the blocking client; drop it off the runtime too
    let _ = tokio::task::spawn_blocking(move || drop(ctx)).await;

    signal?;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
