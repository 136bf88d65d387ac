use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_recommender::{
    api::{create_router, AppState},
    config::Config,
    services::{RatingsStore, Recommender},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Load once, then freeze: nothing below mutates the catalog
    let store = RatingsStore::new(&config.artifact_path);
    let ratings = match store.load() {
        Ok(ratings) => ratings,
        Err(e) => {
            tracing::error!(
                path = %store.path().display(),
                error = %e,
                "Movie data unavailable; place or regenerate the ratings artifact and restart"
            );
            return Err(e.into());
        }
    };
    let recommender = Arc::new(Recommender::prepare(ratings));

    let state = AppState::from_config(recommender, &config);
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
