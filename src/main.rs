use launch_analyzer::{
    api::{build_router, AppState},
    config::AppConfig,
    handlers::RequestHandler,
    messaging::{connect, declare_topology, ConsumerPool},
    search::EsClient,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing; LOGGING_LEVEL supplies the default verbosity
    // when RUST_LOG is unset.
    let default_directive = format!(
        "launch_analyzer={},tower_http=info",
        config.logging_level.to_lowercase()
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting launch-analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Backend client and the shared request handler
    let client = Arc::new(EsClient::new(config.es_hosts.clone(), config.search.clone())?);
    let handler = Arc::new(RequestHandler::new(client.clone()));

    // Broker topology and consumers
    let conn = Arc::new(connect(&config).await?);
    declare_topology(&conn, &config).await?;

    let cancel = CancellationToken::new();
    let pool = ConsumerPool::new(conn, handler.clone(), cancel.clone());
    let consumer_handles = pool.spawn_consumers().await?;
    tracing::info!("AMQP consumers started");

    // HTTP gateway
    let state = AppState::new(handler, client);
    let app = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("HTTP gateway listening on http://{}", http_addr);

    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = http_handle => {
            tracing::warn!("HTTP server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    // Stop pulling new deliveries, let in-flight workers finish, then
    // drop the connection.
    cancel.cancel();
    for handle in consumer_handles {
        let _ = handle.await;
    }
    pool.close().await;

    tracing::info!("Shut down gracefully");
    Ok(())
}
