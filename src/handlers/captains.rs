use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ApiError,
    models::captain::CaptainViewResponse,
    services::{league::LeagueContext, live_score::GameweekLive, views::build_captain_view},
    AppState,
};

/// Handler for GET /api/leagues/{league_id}/captains
pub async fn get_captain_view(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
) -> Result<Json<CaptainViewResponse>, ApiError> {
    tracing::info!(league_id = league_id, "Building captain view");

    let fpl = state.fpl.as_ref();
    let ctx = LeagueContext::load(fpl, league_id).await?;
    let (live, selections) =
        tokio::try_join!(GameweekLive::fetch(fpl, ctx.gameweek), ctx.selections(fpl))?;

    Ok(Json(build_captain_view(
        ctx.gameweek,
        &ctx.directory,
        &live,
        &selections.results,
        selections.skipped,
    )))
}
