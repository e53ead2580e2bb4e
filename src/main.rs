use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinematch_api::api::{create_router, AppState};
use cinematch_api::config::Config;
use cinematch_api::services::enrichment::TmdbProvider;
use cinematch_api::store::{self, Catalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,cinematch_api=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Load artifacts eagerly, before the listener binds. A failed load
    // leaves the service up with catalog endpoints answering 503.
    let catalog = match Catalog::load(&config.artifacts_dir) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load catalog artifacts");
            None
        }
    };

    let id_map = store::load_id_map(&config.metadata_csv_path);

    if config.tmdb_api_key.is_none() {
        tracing::warn!("TMDB_API_KEY is not set, enrichment will serve placeholder content");
    }
    let provider = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
    )?;

    let state = AppState::new(catalog, id_map, Arc::new(provider));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Movie recommender API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
