mod api;
mod bandlab;
mod cache;
mod config;
mod error;
mod link;
mod relay;
mod submission;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::api::AppState;
use crate::config::{Config, CONFIG_FILE};

static DEFAULT_LOG_FILTER: &str = "song_resolver=info,tower_http=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::get_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Error reading {}: {}", CONFIG_FILE, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("Server ended: {:?}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    let http = config.http_client()?;
    let app = api::router(AppState::new(&config, http));

    let listener = TcpListener::bind(config.listen).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

/// Resolves on SIGTERM or SIGINT
async fn shutdown_signal() {
    let (mut terminate, mut interrupt) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(t), Ok(i)) => (t, i),
        (Err(e), _) | (_, Err(e)) => {
            error!("Error creating signal handlers: {}", e);
            return std::future::pending().await;
        }
    };

    tokio::select! {
        _ = terminate.recv() => info!("Received SIGTERM, exiting"),
        _ = interrupt.recv() => info!("Received SIGINT, exiting"),
    }
}
