mod routes;
mod models;
mod concepts;
mod gemini;

use anyhow::Context;
use axum::{Router, routing::{post, get}};
use routes::{attach_product, create_campaign, generate_variations, get_campaign, list_concepts, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use std::sync::Arc;
use tower_http::cors::{CorsLayer, Any};

use crate::gemini::GeminiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // An absent key is not a startup error; it surfaces as a call-time failure.
    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; generation calls will fail until it is provided");
    } else {
        tracing::info!("Using API key: {}...", &api_key[..std::cmp::min(10, api_key.len())]);
    }
    let state = AppState {
        store: Arc::default(),
        generator: Arc::new(GeminiClient::new(api_key)),
    };

    let app = Router::new()
        .route("/api/concepts", get(list_concepts))
        .route("/api/campaign", post(create_campaign))
        .route("/api/campaign/:id", get(get_campaign))
        .route("/api/campaign/:id/product", post(attach_product))
        .route("/api/campaign/:id/generate", post(generate_variations))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state);

    let port: u16 = std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8080);
    let addr = SocketAddr::from(([0,0,0,0], port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.context("binding listener")?;
    axum::serve(listener, app).await.context("serving requests")?;
    Ok(())
}
