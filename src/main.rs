use std::{sync::Arc, time::Duration};

use cadence_api::{
    config::Config,
    db::{self, PgPreferenceStore},
    routes::{create_router, AppState},
    services::{
        providers::{ClientCredentialsSource, SpotifyProvider, TokenCache},
        TrackService,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cadence_api=debug,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Storage
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    let preferences = PgPreferenceStore::new(pool);

    // Catalog provider
    let http_client = reqwest::Client::new();
    let token_cache = TokenCache::new(ClientCredentialsSource::new(
        http_client.clone(),
        config.spotify_token_url.clone(),
        config.spotify_client_id.clone(),
        config.spotify_client_secret.clone(),
    ));
    let catalog = SpotifyProvider::new(
        http_client,
        token_cache,
        config.spotify_api_url.clone(),
        config.spotify_market.clone(),
    );

    let state = AppState::new(TrackService::new(Arc::new(catalog), Arc::new(preferences)));
    let app = create_router(state, Duration::from_secs(config.request_timeout_secs));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
