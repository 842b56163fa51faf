//! Wallet ledger API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use ledger_api::dispatch::{ChannelPublisher, run_projection};
use ledger_api::state::AppState;
use ledger_core::clock::SystemClock;
use ledger_event_store::PgEventStore;
use ledger_wallet::projection::InMemoryDocumentStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting wallet ledger API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| "DATABASE_URL environment variable must be set")?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| format!("PORT must be a valid u16: {e}"))?;

    // Create database connection pool and bring the schema up to date.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    // Wire collaborators explicitly: event store, in-process broker seam,
    // read-model store, and the projection task draining the channel.
    let (publisher, receiver) = ChannelPublisher::pair();
    let documents = Arc::new(InMemoryDocumentStore::new());
    let projection_documents = Arc::clone(&documents);
    tokio::spawn(run_projection(receiver, projection_documents));

    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(PgEventStore::new(pool)),
        Arc::new(publisher),
        documents,
    );

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = ledger_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
