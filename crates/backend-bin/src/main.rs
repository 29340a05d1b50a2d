// ============================
// crates/backend-bin/src/main.rs
// ============================
//! Tokio / Axum entry‑point for the website backend.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use backend_lib::{
    config::{Settings, DEFAULT_CONFIG_FILE},
    create_router,
    fragments::{FragmentLoader, PAGE_FRAGMENTS},
    AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Website backend: pages, directory-backed login and presence socket
#[derive(Debug, Parser)]
#[command(name = "website", version)]
struct Cli {
    /// TOML settings file; skipped when missing
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the configured listen port
    #[arg(short, long)]
    port: Option<u16>,
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the variables may come from the environment.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = Settings::load_from(&cli.config)
        .with_context(|| format!("loading settings (config file {})", cli.config.display()))?;
    if let Some(port) = cli.port {
        settings.server.port = port;
        settings.validate().context("validating --port")?;
    }

    init_tracing(&settings.log_level);
    tracing::debug!(?settings, "settings loaded");

    // Pages cannot render without these, so refuse to start instead.
    FragmentLoader::new(settings.elements_dir())
        .ensure_present(&PAGE_FRAGMENTS)
        .await
        .with_context(|| format!("checking fragments in {}", settings.elements_dir().display()))?;

    let addr = settings.server.bind_addr()?;
    let state = Arc::new(AppState::new(settings).context("building application state")?);
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
