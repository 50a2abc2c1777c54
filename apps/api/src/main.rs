mod backend;
mod config;
mod errors;
mod models;
mod resolver;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend::BackendClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::session::{InMemorySessionStore, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Onramp API v{}", env!("CARGO_PKG_VERSION"));

    // Gateway to the platform backend
    let backend = BackendClient::new(config.backend_base_url.clone(), config.http_timeout_secs);
    info!("Backend client initialized (base: {})", config.backend_base_url);

    // Advisory session cache for resolved entity ids
    let session: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    let state = AppState {
        backend,
        session,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
