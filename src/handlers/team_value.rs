use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ApiError,
    models::team_value::TeamValueResponse,
    services::{
        league::{fan_out, LeagueContext},
        views::build_team_value_view,
    },
    AppState,
};

/// Handler for GET /api/leagues/{league_id}/team-value
pub async fn get_team_value_view(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
) -> Result<Json<TeamValueResponse>, ApiError> {
    tracing::info!(league_id = league_id, "Building team value view");

    let fpl = state.fpl.as_ref();
    let ctx = LeagueContext::load(fpl, league_id).await?;
    let histories = fan_out(ctx.managers(), |manager| fpl.manager_history(manager.entry)).await?;

    Ok(Json(build_team_value_view(
        ctx.gameweek,
        state.settings.team_value_trend_gameweeks,
        &histories.results,
        histories.skipped,
    )))
}
