//! Transfer enrichment: who came in, who went out, and what it earned.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::models::fpl::{ManagerPicks, Pick, StandingEntry, TransferEvent};
use crate::models::transfers::{
    EnrichedTransfer, ManagerTransfers, TransferDirection, TransferTally, TransferTallyResponse,
};
use crate::services::fpl_api::FplApi;
use crate::services::players::{PlayerDirectory, PlayingPosition};
use crate::services::stats::LiveStatsIndex;

const MAX_GOALKEEPER_SWAPS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferPairingError {
    #[error(
        "manager {entry} gameweek {gameweek}: {transferred_in} {position} players in but {transferred_out} out"
    )]
    CountMismatch {
        entry: i32,
        gameweek: i32,
        position: &'static str,
        transferred_in: usize,
        transferred_out: usize,
    },
}

fn check_counts(
    entry: i32,
    gameweek: i32,
    position: &'static str,
    transferred_in: &[Pick],
    transferred_out: &[Pick],
) -> Result<(), TransferPairingError> {
    if transferred_in.len() == transferred_out.len() {
        Ok(())
    } else {
        Err(TransferPairingError::CountMismatch {
            entry,
            gameweek,
            position,
            transferred_in: transferred_in.len(),
            transferred_out: transferred_out.len(),
        })
    }
}

fn is_goalkeeper(pick: &Pick, directory: &PlayerDirectory) -> bool {
    match directory.position_of(pick.element) {
        Some(position) => position == PlayingPosition::Goalkeeper,
        // Squad slots 1 and 12 are reserved for goalkeepers
        None => pick.position == 1 || pick.position == 12,
    }
}

/// Rebuild a wildcard or free-hit gameweek's transfers from a squad diff.
///
/// Goalkeepers pair with goalkeepers (at most two swaps), the remaining
/// outfield players pair in squad-slot order. Mismatched counts are a fault,
/// never a truncated list.
pub fn pair_squad_changes(
    entry: i32,
    gameweek: i32,
    previous: &[Pick],
    current: &[Pick],
    directory: &PlayerDirectory,
) -> Result<Vec<TransferEvent>, TransferPairingError> {
    let previous_ids: HashSet<i32> = previous.iter().map(|p| p.element).collect();
    let current_ids: HashSet<i32> = current.iter().map(|p| p.element).collect();

    let mut transferred_in: Vec<Pick> = current
        .iter()
        .filter(|p| !previous_ids.contains(&p.element))
        .copied()
        .collect();
    let mut transferred_out: Vec<Pick> = previous
        .iter()
        .filter(|p| !current_ids.contains(&p.element))
        .copied()
        .collect();
    transferred_in.sort_by_key(|p| p.position);
    transferred_out.sort_by_key(|p| p.position);

    check_counts(entry, gameweek, "squad", &transferred_in, &transferred_out)?;

    let (keepers_in, outfield_in): (Vec<Pick>, Vec<Pick>) = transferred_in
        .into_iter()
        .partition(|p| is_goalkeeper(p, directory));
    let (keepers_out, outfield_out): (Vec<Pick>, Vec<Pick>) = transferred_out
        .into_iter()
        .partition(|p| is_goalkeeper(p, directory));

    check_counts(entry, gameweek, "goalkeeper", &keepers_in, &keepers_out)?;
    check_counts(entry, gameweek, "outfield", &outfield_in, &outfield_out)?;

    let swap = |(pick_in, pick_out): (&Pick, &Pick)| TransferEvent {
        element_in: pick_in.element,
        element_in_cost: 0,
        element_out: pick_out.element,
        element_out_cost: 0,
        entry,
        event: gameweek,
        time: String::new(),
    };

    let mut pairs: Vec<TransferEvent> = keepers_in
        .iter()
        .zip(keepers_out.iter())
        .take(MAX_GOALKEEPER_SWAPS)
        .map(swap)
        .collect();
    pairs.extend(outfield_in.iter().zip(outfield_out.iter()).map(swap));

    Ok(pairs)
}

/// Attach names and gameweek points to a raw transfer. Zero costs are
/// filled from the player's current price.
pub fn enrich_transfer(
    transfer: &TransferEvent,
    directory: &PlayerDirectory,
    stats: &LiveStatsIndex,
    inferred: bool,
) -> EnrichedTransfer {
    let element_in_points = stats.total_points(transfer.element_in);
    let element_out_points = stats.total_points(transfer.element_out);

    let fill_cost = |cost: i32, element: i32| {
        if cost == 0 {
            directory.now_cost(element)
        } else {
            cost
        }
    };

    EnrichedTransfer {
        entry: transfer.entry,
        gameweek: transfer.event,
        element_in: directory.summary(transfer.element_in),
        element_out: directory.summary(transfer.element_out),
        element_in_cost: fill_cost(transfer.element_in_cost, transfer.element_in),
        element_out_cost: fill_cost(transfer.element_out_cost, transfer.element_out),
        element_in_points,
        element_out_points,
        point_difference: element_in_points - element_out_points,
        inferred,
    }
}

/// One manager's row in the transfer view. A pairing fault is reported on
/// the row rather than failing the league.
pub fn summarize_manager_transfers(
    standing: &StandingEntry,
    selection: &ManagerPicks,
    transfers: Result<Vec<TransferEvent>, TransferPairingError>,
    inferred: bool,
    directory: &PlayerDirectory,
    stats: &LiveStatsIndex,
) -> ManagerTransfers {
    let (transfers, fault) = match transfers {
        Ok(transfers) => (transfers, None),
        Err(e) => {
            warn!(entry = standing.entry, error = %e, "Could not pair squad changes");
            (Vec::new(), Some(e.to_string()))
        }
    };

    let enriched: Vec<EnrichedTransfer> = transfers
        .iter()
        .map(|t| enrich_transfer(t, directory, stats, inferred))
        .collect();

    let history = &selection.entry_history;
    let transfer_result =
        enriched.iter().map(|t| t.point_difference).sum::<i32>() - history.event_transfers_cost;

    ManagerTransfers {
        entry: standing.entry,
        entry_name: standing.entry_name.clone(),
        player_name: standing.player_name.clone(),
        active_chip: selection.active_chip.clone(),
        event_transfers: history.event_transfers,
        event_transfers_cost: history.event_transfers_cost,
        transfers: enriched,
        transfer_result,
        fault,
    }
}

/// Fetch and enrich one manager's transfers for `gameweek`
pub async fn load_manager_transfers(
    fpl: &dyn FplApi,
    standing: &StandingEntry,
    gameweek: i32,
    directory: &PlayerDirectory,
    stats: &LiveStatsIndex,
) -> Result<ManagerTransfers, FetchError> {
    let entry = standing.entry;
    let selection = fpl.picks(entry, gameweek).await?;

    let squad_replaced = selection
        .active_chip
        .as_ref()
        .is_some_and(|chip| chip.replaces_squad());

    if squad_replaced && gameweek > 1 {
        debug!(entry = entry, gameweek = gameweek, "Deriving transfers from squad diff");
        let previous = fpl.picks(entry, gameweek - 1).await?;
        let pairs =
            pair_squad_changes(entry, gameweek, &previous.picks, &selection.picks, directory);
        return Ok(summarize_manager_transfers(
            standing, &selection, pairs, true, directory, stats,
        ));
    }

    let log: Vec<TransferEvent> = fpl
        .transfers(entry)
        .await?
        .into_iter()
        .filter(|t| t.event == gameweek)
        .collect();

    Ok(summarize_manager_transfers(
        standing,
        &selection,
        Ok(log),
        false,
        directory,
        stats,
    ))
}

/// Gameweek range covered by a trend window ending at `current`
pub fn trend_window(current: i32, gameweeks: i32) -> (i32, i32) {
    ((current - gameweeks.max(1) + 1).max(1), current)
}

/// Players most often transferred in (or out) across the league within
/// `[from, to]`, with the managers who made the move
pub fn tally_transfers(
    direction: TransferDirection,
    from: i32,
    to: i32,
    managers: &[(StandingEntry, Vec<TransferEvent>)],
    directory: &PlayerDirectory,
) -> TransferTallyResponse {
    let mut tally: BTreeMap<i32, Vec<String>> = BTreeMap::new();

    for (standing, transfers) in managers {
        for transfer in transfers.iter().filter(|t| (from..=to).contains(&t.event)) {
            let element = match direction {
                TransferDirection::In => transfer.element_in,
                TransferDirection::Out => transfer.element_out,
            };
            tally
                .entry(element)
                .or_default()
                .push(standing.player_name.clone());
        }
    }

    let mut players: Vec<TransferTally> = tally
        .into_iter()
        .map(|(element, managers)| TransferTally {
            player: directory.summary(element),
            managers,
        })
        .collect();
    players.sort_by(|a, b| b.managers.len().cmp(&a.managers.len()));

    TransferTallyResponse {
        direction,
        from_gameweek: from,
        to_gameweek: to,
        players,
    }
}
