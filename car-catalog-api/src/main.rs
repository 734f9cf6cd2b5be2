use anyhow::Context;
use car_catalog_api::{app, config::Config, constants::API_NAME, db, service::CarService};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("{} Starting car catalog server on port {}", API_NAME, config.server_port);

    // Create database connection pool and apply migrations
    let pool = db::connect(&config.database_url).await?;
    tracing::info!("{} Connected to database", API_NAME);

    // Initialize service
    let service = CarService::new(pool);
    if config.seed_demo_data {
        service
            .seed_demo_data()
            .await
            .context("Failed to seed demo data")?;
    }

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("{} Server listening on {}", API_NAME, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("{} Failed to listen for shutdown signal: {}", API_NAME, e);
    }
    tracing::info!("{} Shutting down", API_NAME);
}
