use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::ApiError,
    models::bench::BenchViewResponse,
    services::{league::LeagueContext, live_score::GameweekLive, views::build_bench_view},
    AppState,
};

/// Handler for GET /api/leagues/{league_id}/bench
/// Bench points and automatic substitutions per manager
pub async fn get_bench_view(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
) -> Result<Json<BenchViewResponse>, ApiError> {
    let fpl = state.fpl.as_ref();
    let ctx = LeagueContext::load(fpl, league_id).await?;
    let (live, selections) =
        tokio::try_join!(GameweekLive::fetch(fpl, ctx.gameweek), ctx.selections(fpl))?;

    Ok(Json(build_bench_view(
        ctx.gameweek,
        &ctx.directory,
        &live,
        &selections.results,
        selections.skipped,
    )))
}
