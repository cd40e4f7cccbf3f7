use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use moodmap_api::{
    cache::RecommendationCache,
    config::Config,
    routes::create_router,
    services::{gemini::GeminiClient, recommendations::RecommendationService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // The client is constructed and injected up front; a missing API key
    // fails here rather than on the first request
    let client = Arc::new(GeminiClient::new(&config)?);
    let cache = RecommendationCache::new(config.cache_max_entries);
    let service = Arc::new(RecommendationService::new(client, cache));

    let app = create_router(service);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
