use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ApiError,
    models::chips::ChipViewResponse,
    services::{
        chips::{build_chip_view, manager_chip_plays},
        league::{fan_out, LeagueContext},
    },
    AppState,
};

/// Handler for GET /api/leagues/{league_id}/chips
/// Season-to-date chip usage across the league
pub async fn get_chip_view(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
) -> Result<Json<ChipViewResponse>, ApiError> {
    tracing::info!(league_id = league_id, "Building chip view");

    let fpl = state.fpl.as_ref();
    let ctx = LeagueContext::load(fpl, league_id).await?;
    let plays = fan_out(ctx.managers(), |manager| manager_chip_plays(fpl, manager.entry)).await?;

    let by_entry: HashMap<i32, _> = plays
        .results
        .into_iter()
        .map(|(standing, plays)| (standing.entry, plays))
        .collect();

    Ok(Json(build_chip_view(
        ctx.gameweek,
        ctx.managers(),
        &by_entry,
        plays.skipped,
    )))
}
