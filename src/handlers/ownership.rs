use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ApiError,
    models::ownership::MostOwnedResponse,
    services::{league::LeagueContext, views::build_most_owned_view},
    AppState,
};

/// Handler for GET /api/leagues/{league_id}/most-owned
pub async fn get_most_owned(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
) -> Result<Json<MostOwnedResponse>, ApiError> {
    let fpl = state.fpl.as_ref();
    let ctx = LeagueContext::load(fpl, league_id).await?;
    let selections = ctx.selections(fpl).await?;

    Ok(Json(build_most_owned_view(
        &ctx,
        &selections.results,
        selections.skipped,
    )))
}
