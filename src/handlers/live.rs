use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ApiError,
    models::live::LiveTableResponse,
    services::{league::LeagueContext, live_score::GameweekLive, views::build_live_table},
    AppState,
};

/// Handler for GET /api/leagues/{league_id}/live
/// Live gameweek table with provisional bonus, ranked by running total
pub async fn get_live_table(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
) -> Result<Json<LiveTableResponse>, ApiError> {
    tracing::info!(league_id = league_id, "Building live table");

    let fpl = state.fpl.as_ref();
    let ctx = LeagueContext::load(fpl, league_id).await?;
    let (live, selections) =
        tokio::try_join!(GameweekLive::fetch(fpl, ctx.gameweek), ctx.selections(fpl))?;

    Ok(Json(build_live_table(
        &ctx,
        &live,
        &selections.results,
        selections.skipped,
    )))
}
