use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{api_error, ApiError},
    models::events::{EventRecord, LeagueEventsResponse, ReconcileReport, RefreshRequest},
    services::{league::LeagueContext, reconciliation::refresh_gameweek, views::build_league_events},
    AppState,
};

const MAX_GAMEWEEK: i32 = 38;

fn validate_gameweek(gameweek: i32) -> Result<i32, ApiError> {
    if (1..=MAX_GAMEWEEK).contains(&gameweek) {
        Ok(gameweek)
    } else {
        Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Gameweek must be between 1 and {}, got {}", MAX_GAMEWEEK, gameweek),
        ))
    }
}

/// Handler for GET /api/events/{gw}
pub async fn get_gameweek_events(
    State(state): State<AppState>,
    Path(gw): Path<i32>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    let gameweek = validate_gameweek(gw)?;
    let events = state.events.events_for_gameweek(gameweek).await?;
    Ok(Json(events))
}

/// Handler for POST /api/events/refresh
/// Reconciles the event table with the live feed; defaults to the current gameweek
pub async fn refresh_events(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ReconcileReport>, ApiError> {
    let gameweek = match request.gameweek {
        Some(gw) => validate_gameweek(gw)?,
        None => state.fpl.bootstrap_static().await?.current_gameweek(),
    };

    tracing::info!(gameweek = gameweek, "Refreshing events");
    let report = refresh_gameweek(state.fpl.as_ref(), state.events.as_ref(), gameweek).await?;
    Ok(Json(report))
}

/// Handler for GET /api/leagues/{league_id}/events
/// Refreshes the current gameweek, then lists events of players owned in the league
pub async fn get_league_events(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
) -> Result<Json<LeagueEventsResponse>, ApiError> {
    let fpl = state.fpl.as_ref();
    let store = state.events.as_ref();
    let ctx = LeagueContext::load(fpl, league_id).await?;

    let report = refresh_gameweek(fpl, store, ctx.gameweek).await?;
    let selections = ctx.selections(fpl).await?;
    if !selections.skipped.is_empty() {
        tracing::warn!(
            league_id = league_id,
            skipped = selections.skipped.len(),
            "League events are missing managers"
        );
    }
    let events = store.events_for_gameweek(ctx.gameweek).await?;

    Ok(Json(build_league_events(
        ctx.gameweek,
        &ctx.directory,
        events,
        &selections.results,
        Some(report),
    )))
}
