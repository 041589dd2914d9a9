//! Binary entry point: load settings, open the database, and serve the song
//! API until interrupted.
use std::sync::Arc;

use anyhow::Context;
use song_library::db::{open_database, SqliteSongRepository};
use song_library::enrichment::{HttpMetadataProvider, MetadataProvider, PlaceholderMetadata};
use song_library::{http, Config, SongService};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hyper=warn".into()),
        )
        .init();

    let config = Config::load()?;
    let conn = open_database(&config.database_path)?;
    info!(path = %config.database_path.display(), "database ready");

    let metadata: Arc<dyn MetadataProvider> = match &config.metadata_api_url {
        Some(url) => {
            info!(%url, "song details enrichment enabled");
            Arc::new(HttpMetadataProvider::new(url.clone(), config.metadata_timeout)?)
        }
        None => {
            warn!("no song info API configured, new songs get placeholder details");
            Arc::new(PlaceholderMetadata)
        }
    };

    let service = SongService::new(Arc::new(SqliteSongRepository::new(conn)), metadata);
    let app = http::router(service);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "song library listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
