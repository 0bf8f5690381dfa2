use std::env;

use sea_orm::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fpl_league_backend::config::AppConfig;
use fpl_league_backend::services::event_store::SeaOrmEventStore;
use fpl_league_backend::services::fpl_api::{FplApi, FplService};
use fpl_league_backend::services::reconciliation::refresh_gameweek;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fpl_league_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    // Optional gameweek argument, defaults to the current one
    let requested: Option<i32> = match env::args().nth(1) {
        Some(arg) => match arg.parse() {
            Ok(gw) => Some(gw),
            Err(_) => {
                eprintln!("Usage: cargo run --bin refresh_events [gameweek]");
                eprintln!("Example: cargo run --bin refresh_events 7");
                std::process::exit(1);
            }
        },
        None => None,
    };

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    let store = SeaOrmEventStore::new(db);
    let fpl = FplService::new(&config.fpl)?;

    let gameweek = match requested {
        Some(gw) => gw,
        None => fpl.bootstrap_static().await?.current_gameweek(),
    };

    tracing::info!(gameweek = gameweek, "Refreshing gameweek events");

    match refresh_gameweek(&fpl, &store, gameweek).await {
        Ok(report) => {
            tracing::info!(
                gameweek = report.gameweek,
                inserted = report.inserted,
                updated = report.updated,
                deleted = report.deleted,
                unchanged = report.unchanged,
                "Refresh complete"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Refresh failed for gameweek {}: {}", gameweek, e);
            Err(e.into())
        }
    }
}
