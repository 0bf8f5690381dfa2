//! Builders for the league dashboard views.
//!
//! Everything here is pure: handlers fetch, these shape.

use std::collections::{BTreeMap, HashMap};

use crate::models::bench::{AutoSubView, BenchPlayer, BenchViewResponse, ManagerBench};
use crate::models::captain::{CaptainPick, CaptainViewResponse};
use crate::models::common::ManagerSummary;
use crate::models::events::{EventRecord, LeaguePlayerEvent, LeagueEventsResponse, ReconcileReport};
use crate::models::fpl::{Chip, ManagerHistory, ManagerPicks, StandingEntry};
use crate::models::live::{BonusWinner, FixtureBonus, LiveTableResponse, ManagerLiveEntry};
use crate::models::ownership::{MostOwnedResponse, OwnedPlayer};
use crate::models::team_value::{TeamValueEntry, TeamValueResponse};
use crate::services::league::LeagueContext;
use crate::services::live_score::GameweekLive;
use crate::services::players::{manager_summary, PlayerDirectory};

pub type Selections = [(StandingEntry, ManagerPicks)];

fn bonus_winner(
    directory: &PlayerDirectory,
    fixture_id: i32,
    player_id: i32,
    points: i32,
) -> BonusWinner {
    BonusWinner {
        fixture_id,
        points,
        player: directory.summary(player_id),
    }
}

pub fn build_live_table(
    ctx: &LeagueContext,
    live: &GameweekLive,
    selections: &Selections,
    skipped_managers: Vec<i32>,
) -> LiveTableResponse {
    let mut managers: Vec<ManagerLiveEntry> = selections
        .iter()
        .map(|(standing, selection)| {
            let score = live.score(selection);

            let bonus_players = score
                .picks
                .iter()
                .filter(|pick| pick.counted && pick.bonus_points > 0)
                .flat_map(|pick| {
                    live.bonus
                        .awards_for_player(pick.element, live.stats.fixtures(pick.element))
                })
                .map(|award| {
                    bonus_winner(&ctx.directory, award.fixture_id, award.player_id, award.points)
                })
                .collect();

            ManagerLiveEntry {
                live_rank: 0,
                manager: manager_summary(standing),
                active_chip: selection.active_chip.clone(),
                gameweek_points: score.gameweek_points,
                bonus_points: score.bonus_points,
                total_points: score.total_points,
                players_started: score.players_started,
                bonus_players,
                picks: score.picks,
            }
        })
        .collect();

    managers.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then(a.manager.rank.cmp(&b.manager.rank))
    });

    // Standard competition ranking: equal totals share a rank
    let mut previous: Option<(i32, usize)> = None;
    for (index, manager) in managers.iter_mut().enumerate() {
        let rank = match previous {
            Some((total, rank)) if total == manager.total_points => rank,
            _ => index + 1,
        };
        manager.live_rank = rank;
        previous = Some((manager.total_points, rank));
    }

    let bonus = live
        .bonus
        .fixtures()
        .map(|(fixture_id, awards)| FixtureBonus {
            fixture_id,
            winners: awards
                .iter()
                .map(|a| bonus_winner(&ctx.directory, fixture_id, a.player_id, a.points))
                .collect(),
        })
        .collect();

    LiveTableResponse {
        league_id: ctx.league_id,
        league_name: ctx.league_name().to_string(),
        gameweek: live.gameweek,
        managers,
        bonus,
        skipped_managers,
    }
}

pub fn build_captain_view(
    gameweek: i32,
    directory: &PlayerDirectory,
    live: &GameweekLive,
    selections: &Selections,
    skipped_managers: Vec<i32>,
) -> CaptainViewResponse {
    let mut by_captain: BTreeMap<i32, Vec<ManagerSummary>> = BTreeMap::new();

    for (standing, selection) in selections {
        match selection.picks.iter().find(|pick| pick.is_captain) {
            Some(captain) => by_captain
                .entry(captain.element)
                .or_default()
                .push(manager_summary(standing)),
            None => tracing::debug!(entry = standing.entry, "Selection without captain"),
        }
    }

    let mut captains: Vec<CaptainPick> = by_captain
        .into_iter()
        .map(|(element, managers)| CaptainPick {
            player: directory.summary(element),
            times_picked: managers.len(),
            captain_points: live.player_points(element),
            managers,
        })
        .collect();

    captains.sort_by(|a, b| {
        b.captain_points
            .cmp(&a.captain_points)
            .then(b.times_picked.cmp(&a.times_picked))
    });

    CaptainViewResponse {
        gameweek,
        captains,
        skipped_managers,
    }
}

/// Team value at `gameweek`, or the latest recorded before it
fn value_at(history: &ManagerHistory, gameweek: i32) -> Option<(i32, i32)> {
    history
        .current
        .iter()
        .filter(|gw| gw.event <= gameweek)
        .max_by_key(|gw| gw.event)
        .map(|gw| (gw.value, gw.bank))
}

pub fn build_team_value_view(
    gameweek: i32,
    trend_gameweeks: i32,
    histories: &[(StandingEntry, ManagerHistory)],
    skipped_managers: Vec<i32>,
) -> TeamValueResponse {
    let trend_gameweek = (gameweek - (trend_gameweeks - 1).max(0)).max(1);

    let mut managers: Vec<TeamValueEntry> = histories
        .iter()
        .map(|(standing, history)| {
            let (team_value, bank) = value_at(history, gameweek).unwrap_or((0, 0));
            let trend_value = value_at(history, trend_gameweek)
                .map(|(value, _)| value)
                .unwrap_or(team_value);

            TeamValueEntry {
                entry: standing.entry,
                player_name: standing.player_name.clone(),
                team_value,
                trend_value,
                trend: team_value - trend_value,
                bank,
            }
        })
        .collect();

    managers.sort_by(|a, b| b.team_value.cmp(&a.team_value));

    TeamValueResponse {
        gameweek,
        trend_gameweek,
        managers,
        skipped_managers,
    }
}

/// Managers owning each player in their current squad
fn owners(selections: &Selections) -> HashMap<i32, Vec<ManagerSummary>> {
    let mut owners: HashMap<i32, Vec<ManagerSummary>> = HashMap::new();
    for (standing, selection) in selections {
        for pick in &selection.picks {
            owners
                .entry(pick.element)
                .or_default()
                .push(manager_summary(standing));
        }
    }
    owners
}

pub fn build_most_owned_view(
    ctx: &LeagueContext,
    selections: &Selections,
    skipped_managers: Vec<i32>,
) -> MostOwnedResponse {
    let mut players: Vec<OwnedPlayer> = owners(selections)
        .into_iter()
        .map(|(element, managers)| OwnedPlayer {
            player: ctx.directory.summary(element),
            ownership: managers.len(),
            managers,
        })
        .collect();

    players.sort_by(|a, b| {
        b.ownership
            .cmp(&a.ownership)
            .then(a.player.id.cmp(&b.player.id))
    });

    MostOwnedResponse {
        gameweek: ctx.gameweek,
        league_name: ctx.league_name().to_string(),
        players,
        skipped_managers,
    }
}

pub fn build_bench_view(
    gameweek: i32,
    directory: &PlayerDirectory,
    live: &GameweekLive,
    selections: &Selections,
    skipped_managers: Vec<i32>,
) -> BenchViewResponse {
    let managers = selections
        .iter()
        .map(|(standing, selection)| {
            let score = live.score(selection);

            let bench: Vec<BenchPlayer> = score
                .picks
                .iter()
                .filter(|pick| pick.position > 11)
                .map(|pick| BenchPlayer {
                    position: pick.position,
                    player: directory.summary(pick.element),
                    points: live.player_points(pick.element),
                    minutes: pick.minutes,
                })
                .collect();

            let points_on_bench = if selection.active_chip == Some(Chip::BenchBoost) {
                0
            } else {
                bench.iter().map(|b| b.points).sum()
            };

            let auto_subs = selection
                .automatic_subs
                .iter()
                .map(|sub| AutoSubView {
                    element_in: directory.summary(sub.element_in),
                    element_in_points: live.player_points(sub.element_in),
                    element_out: directory.summary(sub.element_out),
                    element_out_points: live.player_points(sub.element_out),
                })
                .collect();

            ManagerBench {
                entry: standing.entry,
                entry_name: standing.entry_name.clone(),
                player_name: standing.player_name.clone(),
                points_on_bench,
                bench,
                auto_subs,
            }
        })
        .collect();

    BenchViewResponse {
        gameweek,
        managers,
        skipped_managers,
    }
}

/// Persisted events of players owned somewhere in the league, newest first
pub fn build_league_events(
    gameweek: i32,
    directory: &PlayerDirectory,
    events: Vec<EventRecord>,
    selections: &Selections,
    refresh: Option<ReconcileReport>,
) -> LeagueEventsResponse {
    let owners = owners(selections);

    let mut events: Vec<LeaguePlayerEvent> = events
        .into_iter()
        .filter_map(|event| {
            let managers = owners.get(&event.player_id)?.clone();
            Some(LeaguePlayerEvent {
                player: directory.summary(event.player_id),
                managers,
                event,
            })
        })
        .collect();

    events.sort_by(|a, b| b.event.updated_at.cmp(&a.event.updated_at));

    LeagueEventsResponse {
        gameweek,
        refresh,
        events,
    }
}
