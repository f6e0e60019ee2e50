//! mimird, the Mimir daemon.
//!
//! Serves the read-through book catalog over HTTP, so several frontends
//! share one cache and one upstream quota.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mimir::server::build_router;
use mimir::server::config::{BackendKind, Config, Secrets};
use mimir::{CacheConfig, Mimir, MimirError, ReadThroughCatalog};

/// Mimir daemon: read-through cache for the Google Books API.
#[derive(Parser)]
#[command(name = "mimird")]
#[command(version = mimir::PKG_VERSION)]
#[command(about = "Mimir book catalog cache daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Address to bind to (overrides the config file).
    #[arg(short, long, env = "MIMIR_ADDRESS")]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let catalog = build_catalog(&config, &secrets)?;

    let address = args.address.unwrap_or_else(|| config.server.address.clone());
    let addr: SocketAddr = address
        .parse()
        .map_err(|e| MimirError::Configuration(format!("Invalid address: {e}")))?;

    info!(
        version = mimir::version_string(),
        %addr,
        provider = catalog.provider_name(),
        cache = catalog.cache().backend_name(),
        "mimird starting"
    );

    let app = build_router(Arc::new(catalog));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("mimird stopped");
    Ok(())
}

/// Build a [`ReadThroughCatalog`] from configuration.
fn build_catalog(config: &Config, secrets: &Secrets) -> Result<ReadThroughCatalog, MimirError> {
    let key = secrets.google_books_key().ok_or_else(|| {
        MimirError::Configuration(
            "Google Books API key missing: set [google_books] in secrets.toml or GOOGLE_BOOKS_API_KEY"
                .to_string(),
        )
    })?;

    let mut builder = Mimir::builder()
        .google_books(key)
        .memory_cache(CacheConfig::new().max_entries(config.cache.max_entries))
        .search_ttl(config.cache.search_ttl());

    if let Some(ref url) = config.catalog.base_url {
        builder = builder.base_url(url);
    }

    if let Some(ref prefix) = config.cache.key_prefix {
        builder = builder.key_prefix(prefix);
    }

    if config.cache.backend == BackendKind::Redis {
        #[cfg(feature = "redis")]
        match secrets.redis_url() {
            Some(url) => builder = builder.redis(url),
            None => warn!("redis backend selected but no URL configured, using in-process cache"),
        }
        #[cfg(not(feature = "redis"))]
        warn!("redis backend selected but built without the redis feature, using in-process cache");
    }

    builder.build()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
