//! Address book server binary.
//!
//! Reads `addressbook.toml` (or the path specified with `--config`), connects
//! to the configured contact store, and serves the JSON API over HTTP.
//!
//! ```
//! cargo run -p addressbook-server -- --backend memory
//! ```

mod settings;

use std::path::PathBuf;

use addressbook_api::{AppState, api_router};
use addressbook_core::{
  memory::MemoryStore,
  store::{ContactStore, IndexStatus},
};
use addressbook_store_es::EsStore;
use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{Backend, ServerConfig};

#[derive(Parser)]
#[command(author, version, about = "Address book REST API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "addressbook.toml")]
  config: PathBuf,

  /// Override the configured contact store.
  #[arg(long, value_enum)]
  backend: Option<Backend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut server_cfg = settings::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  if let Some(backend) = cli.backend {
    server_cfg.backend = backend;
  }

  match server_cfg.backend {
    Backend::Elasticsearch => {
      let es_cfg = server_cfg.es_config();
      let store = EsStore::new(es_cfg.clone())
        .with_context(|| format!("failed to build client for {}", es_cfg.url))?;
      tracing::info!(url = %es_cfg.url, index = %es_cfg.index, "using elasticsearch");
      serve(store, &server_cfg).await
    }
    Backend::Memory => {
      tracing::warn!("using in-memory store; contacts are lost on exit");
      serve(MemoryStore::new(), &server_cfg).await
    }
  }
}

async fn serve<S>(store: S, server_cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: ContactStore + Clone + Send + Sync + 'static,
{
  // A down engine must not keep the server from starting; `GET /` retries.
  if server_cfg.bootstrap_index {
    match store.ensure_index().await {
      Ok(IndexStatus::Created) => {
        tracing::info!(index = %server_cfg.index, "index created");
      }
      Ok(IndexStatus::Existing) => {
        tracing::info!(index = %server_cfg.index, "index loaded");
      }
      Err(e) => {
        tracing::warn!(index = %server_cfg.index, error = %e, "index bootstrap failed");
      }
    }
  }

  let state = AppState::new(store, server_cfg.api_config());
  let app = api_router(state).layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for ctrl-c");
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
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }
  tracing::info!("shutdown signal received");
}
