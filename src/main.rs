//! edtoys-api: serves the edtoys record API
//!
//! Configuration comes from the YAML file named by the first argument or
//! `EDTOYS_CONFIG`, then `EDTOYS_DB_DSN` / `EDTOYS_PORT`. Without a DSN the
//! in-memory store is used.

use anyhow::Result;
use edtoys::config::AppConfig;
use edtoys::core::store::EdtoyStore;
use edtoys::server::ServerBuilder;
use edtoys::storage::InMemoryEdtoyStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("edtoys=info,edtoys_api=info,tower_http=info")),
        )
        .init();

    let config = match std::env::args().nth(1).or_else(|| std::env::var("EDTOYS_CONFIG").ok()) {
        Some(path) => AppConfig::from_yaml_file(&path)?,
        None => AppConfig::default(),
    }
    .apply_env_overrides()?;

    let store = open_store(&config).await?;

    ServerBuilder::new()
        .with_shared_store(store)
        .with_listing(config.listing.clone())
        .with_environment(config.server.environment.clone())
        .serve(&config.server.addr())
        .await
}

#[cfg(feature = "postgres")]
async fn open_store(config: &AppConfig) -> Result<Arc<dyn EdtoyStore>> {
    use edtoys::storage::postgres::{PostgresEdtoyStore, connect, migrate};

    let Some(dsn) = config.database.dsn.as_deref() else {
        tracing::warn!("No database DSN configured, using the in-memory store");
        return Ok(in_memory(config));
    };

    let pool = connect(dsn, &config.database).await?;
    migrate(&pool).await?;
    tracing::info!("Database connection pool established");

    Ok(Arc::new(
        PostgresEdtoyStore::new(pool).with_query_timeout(config.database.query_timeout()),
    ))
}

#[cfg(not(feature = "postgres"))]
async fn open_store(config: &AppConfig) -> Result<Arc<dyn EdtoyStore>> {
    if config.database.dsn.is_some() {
        tracing::warn!("Built without the `postgres` feature, ignoring the database DSN");
    }
    Ok(in_memory(config))
}

fn in_memory(config: &AppConfig) -> Arc<dyn EdtoyStore> {
    Arc::new(InMemoryEdtoyStore::new().with_query_timeout(config.database.query_timeout()))
}
