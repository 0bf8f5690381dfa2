use std::sync::Arc;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fpl_league_backend::{
    config::AppConfig,
    handlers,
    services::{event_store::SeaOrmEventStore, fpl_api::FplService},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fpl_league_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None).await?;

    let fpl = FplService::new(&config.fpl)?;
    tracing::info!(base_url = %config.fpl.base_url, "Fantasy API client ready");

    let state = AppState {
        fpl: Arc::new(fpl),
        events: Arc::new(SeaOrmEventStore::new(db)),
        settings: config.dashboard,
    };

    let app = handlers::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
