use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{api_error, ApiError},
    models::transfers::{TransferDirection, TransferTallyResponse, TransferViewResponse},
    services::{
        league::{fan_out, LeagueContext},
        stats::LiveStatsIndex,
        transfers::{load_manager_transfers, tally_transfers, trend_window},
    },
    AppState,
};

/// Handler for GET /api/leagues/{league_id}/transfers
/// Current gameweek transfers per manager with their point outcome
pub async fn get_transfer_view(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
) -> Result<Json<TransferViewResponse>, ApiError> {
    tracing::info!(league_id = league_id, "Building transfer view");

    let fpl = state.fpl.as_ref();
    let ctx = LeagueContext::load(fpl, league_id).await?;
    let gameweek = ctx.gameweek;
    let live = fpl.live_event(gameweek).await?;
    let stats = LiveStatsIndex::from_live(&live);

    let rows = fan_out(ctx.managers(), |manager| {
        load_manager_transfers(fpl, manager, gameweek, &ctx.directory, &stats)
    })
    .await?;

    Ok(Json(TransferViewResponse {
        gameweek,
        managers: rows.results.into_iter().map(|(_, row)| row).collect(),
        skipped_managers: rows.skipped,
    }))
}

/// Handler for GET /api/leagues/{league_id}/transfers/{direction}
/// Most transferred in or out players over the recent gameweeks
pub async fn get_transfer_tally(
    State(state): State<AppState>,
    Path((league_id, direction)): Path<(i32, String)>,
) -> Result<Json<TransferTallyResponse>, ApiError> {
    let direction = TransferDirection::parse(&direction).ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid transfer direction '{}', expected 'in' or 'out'", direction),
        )
    })?;

    tracing::info!(league_id = league_id, direction = ?direction, "Building transfer tally");

    let fpl = state.fpl.as_ref();
    let ctx = LeagueContext::load(fpl, league_id).await?;
    let (from, to) = trend_window(ctx.gameweek, state.settings.transfer_trend_gameweeks);

    let logs = fan_out(ctx.managers(), |manager| fpl.transfers(manager.entry)).await?;
    if !logs.skipped.is_empty() {
        tracing::warn!(skipped = logs.skipped.len(), "Transfer tally is missing managers");
    }

    Ok(Json(tally_transfers(
        direction,
        from,
        to,
        &logs.results,
        &ctx.directory,
    )))
}
