//! Chip usage across a league.

use std::collections::HashMap;

use tracing::debug;

use crate::error::FetchError;
use crate::models::chips::{ChipGraphEntry, ChipPlay, ChipStatus, ChipSummary, ChipViewResponse};
use crate::models::fpl::{Chip, ManagerHistory, StandingEntry};
use crate::services::fpl_api::FplApi;

/// Gameweek points the manager scored, looked up in their season history
fn entry_points(history: &ManagerHistory, gameweek: i32) -> i32 {
    history
        .current
        .iter()
        .find(|gw| gw.event == gameweek)
        .map(|gw| gw.points)
        .unwrap_or(0)
}

/// Gameweek points of the player the manager captained in `gameweek`
pub async fn captain_points(
    fpl: &dyn FplApi,
    entry: i32,
    gameweek: i32,
) -> Result<i32, FetchError> {
    let picks = fpl.picks(entry, gameweek).await?;
    let Some(captain) = picks.picks.iter().find(|pick| pick.is_captain) else {
        debug!(entry = entry, gameweek = gameweek, "No captain in selection");
        return Ok(0);
    };

    let summary = fpl.element_summary(captain.element).await?;
    Ok(summary.points_in_round(gameweek).unwrap_or(0))
}

/// Every tracked chip a manager has played this season, with its points.
///
/// Wildcard, free hit and bench boost are credited with the manager's
/// gameweek points; triple captain with the captain's own points.
pub async fn manager_chip_plays(fpl: &dyn FplApi, entry: i32) -> Result<Vec<ChipPlay>, FetchError> {
    let history = fpl.manager_history(entry).await?;
    let mut plays = Vec::new();

    for played in history.chips.iter().filter(|c| Chip::TRACKED.contains(&c.name)) {
        let points = match played.name {
            Chip::TripleCaptain => captain_points(fpl, entry, played.event).await?,
            _ => entry_points(&history, played.event),
        };

        plays.push(ChipPlay {
            entry,
            gameweek: played.event,
            chip: played.name.clone(),
            points,
        });
    }

    Ok(plays)
}

/// League summary for one chip. Managers that played a chip more than once
/// appear in the graph with their latest play; the average covers every play.
pub fn summarize_chip(
    chip: &Chip,
    standings: &[StandingEntry],
    plays: &HashMap<i32, Vec<ChipPlay>>,
    current_gameweek: i32,
) -> ChipSummary {
    let mut graph = Vec::with_capacity(standings.len());
    let mut users = 0;
    let mut total_points = 0;
    let mut play_count = 0;

    for standing in standings {
        let chip_plays: Vec<&ChipPlay> = plays
            .get(&standing.entry)
            .map(|all| all.iter().filter(|p| &p.chip == chip).collect())
            .unwrap_or_default();

        total_points += chip_plays.iter().map(|p| p.points).sum::<i32>();
        play_count += chip_plays.len();

        let latest = chip_plays.iter().max_by_key(|p| p.gameweek);
        let entry = match latest {
            Some(play) => {
                users += 1;
                ChipGraphEntry {
                    entry: standing.entry,
                    name: standing.player_name.clone(),
                    point: play.points,
                    gameweek: Some(play.gameweek),
                    status: if play.gameweek == current_gameweek {
                        ChipStatus::Current
                    } else {
                        ChipStatus::Yes
                    },
                }
            }
            None => ChipGraphEntry {
                entry: standing.entry,
                name: standing.player_name.clone(),
                point: 0,
                gameweek: None,
                status: ChipStatus::No,
            },
        };
        graph.push(entry);
    }

    graph.sort_by(|a, b| b.point.cmp(&a.point));

    ChipSummary {
        chip: chip.clone(),
        users,
        usage_share: if standings.is_empty() {
            0.0
        } else {
            users as f64 / standings.len() as f64
        },
        average_points: if play_count == 0 {
            0.0
        } else {
            total_points as f64 / play_count as f64
        },
        graph,
    }
}

pub fn build_chip_view(
    current_gameweek: i32,
    standings: &[StandingEntry],
    plays: &HashMap<i32, Vec<ChipPlay>>,
    skipped_managers: Vec<i32>,
) -> ChipViewResponse {
    ChipViewResponse {
        gameweek: current_gameweek,
        league_size: standings.len(),
        chips: Chip::TRACKED
            .iter()
            .map(|chip| summarize_chip(chip, standings, plays, current_gameweek))
            .collect(),
        skipped_managers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fpl::{ChipPlayed, EntryHistory};

    fn standing(entry: i32, name: &str) -> StandingEntry {
        StandingEntry {
            id: entry as i64,
            entry,
            entry_name: format!("{} FC", name),
            player_name: name.to_string(),
            ..Default::default()
        }
    }

    fn play(entry: i32, gameweek: i32, chip: Chip, points: i32) -> ChipPlay {
        ChipPlay {
            entry,
            gameweek,
            chip,
            points,
        }
    }

    #[test]
    fn test_entry_points_reads_history() {
        let history = ManagerHistory {
            current: vec![
                EntryHistory { event: 1, points: 50, ..Default::default() },
                EntryHistory { event: 2, points: 81, ..Default::default() },
            ],
            chips: vec![ChipPlayed { name: Chip::Wildcard, event: 2, time: String::new() }],
        };
        assert_eq!(entry_points(&history, 2), 81);
        assert_eq!(entry_points(&history, 9), 0);
    }

    #[test]
    fn test_summary_share_and_average() {
        let standings = vec![
            standing(1, "Ann"),
            standing(2, "Bo"),
            standing(3, "Cy"),
            standing(4, "Di"),
        ];
        let plays = HashMap::from([
            (1, vec![play(1, 5, Chip::BenchBoost, 20)]),
            (2, vec![play(2, 8, Chip::BenchBoost, 10), play(2, 3, Chip::Wildcard, 70)]),
        ]);

        let summary = summarize_chip(&Chip::BenchBoost, &standings, &plays, 8);
        assert_eq!(summary.users, 2);
        assert_eq!(summary.usage_share, 0.5);
        assert_eq!(summary.average_points, 15.0);

        assert_eq!(summary.graph[0].name, "Ann");
        assert_eq!(summary.graph[0].status, ChipStatus::Yes);
        assert_eq!(summary.graph[1].status, ChipStatus::Current);
        assert_eq!(summary.graph[2].status, ChipStatus::No);
        assert_eq!(summary.graph[3].point, 0);
    }

    #[test]
    fn test_unplayed_chip_has_zero_average() {
        let standings = vec![standing(1, "Ann")];
        let summary = summarize_chip(&Chip::TripleCaptain, &standings, &HashMap::new(), 3);
        assert_eq!(summary.users, 0);
        assert_eq!(summary.average_points, 0.0);
        assert_eq!(summary.usage_share, 0.0);
    }

    #[test]
    fn test_view_covers_every_tracked_chip() {
        let view = build_chip_view(4, &[standing(1, "Ann")], &HashMap::new(), vec![9]);
        let chips: Vec<Chip> = view.chips.iter().map(|c| c.chip.clone()).collect();
        assert_eq!(chips, Chip::TRACKED.to_vec());
        assert_eq!(view.league_size, 1);
        assert_eq!(view.skipped_managers, vec![9]);
    }
}
