use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod bench;
pub mod captains;
pub mod chips;
pub mod events;
pub mod live;
pub mod ownership;
pub mod team_value;
pub mod transfers;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/leagues/{league_id}/live", get(live::get_live_table))
        .route("/api/leagues/{league_id}/captains", get(captains::get_captain_view))
        .route("/api/leagues/{league_id}/chips", get(chips::get_chip_view))
        .route("/api/leagues/{league_id}/transfers", get(transfers::get_transfer_view))
        .route(
            "/api/leagues/{league_id}/transfers/{direction}",
            get(transfers::get_transfer_tally),
        )
        .route("/api/leagues/{league_id}/team-value", get(team_value::get_team_value_view))
        .route("/api/leagues/{league_id}/most-owned", get(ownership::get_most_owned))
        .route("/api/leagues/{league_id}/bench", get(bench::get_bench_view))
        .route("/api/leagues/{league_id}/events", get(events::get_league_events))
        .route("/api/events/refresh", post(events::refresh_events))
        .route("/api/events/{gw}", get(events::get_gameweek_events))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
