//! Live gameweek score for one manager.

use std::collections::HashSet;

use crate::error::FetchError;
use crate::models::fpl::{Chip, Fixture, LiveEvent, ManagerPicks, Pick};
use crate::models::live::{LiveScore, PickScore};
use crate::services::bonus::BonusTable;
use crate::services::fpl_api::FplApi;
use crate::services::stats::{fixture_bps, started_fixtures, LiveStatsIndex};

/// Everything a gameweek's live scoring needs, derived once per request and
/// shared by every manager in the league
#[derive(Debug, Clone, Default)]
pub struct GameweekLive {
    pub gameweek: i32,
    pub stats: LiveStatsIndex,
    pub bonus: BonusTable,
    pub started: HashSet<i32>,
}

impl GameweekLive {
    pub fn build(gameweek: i32, live: &LiveEvent, fixtures: &[Fixture]) -> Self {
        Self {
            gameweek,
            stats: LiveStatsIndex::from_live(live),
            bonus: BonusTable::from_fixtures(&fixture_bps(fixtures)),
            started: started_fixtures(fixtures),
        }
    }

    pub async fn fetch(fpl: &dyn FplApi, gameweek: i32) -> Result<Self, FetchError> {
        let (live, fixtures) = tokio::try_join!(fpl.live_event(gameweek), fpl.fixtures(gameweek))?;
        Ok(Self::build(gameweek, &live, &fixtures))
    }

    pub fn provisional_bonus(&self, player_id: i32) -> i32 {
        self.bonus
            .points_for_player(player_id, self.stats.fixtures(player_id))
    }

    /// Live points for a single player, bonus included, no multiplier
    pub fn player_points(&self, player_id: i32) -> i32 {
        self.stats.base_points(player_id) + self.provisional_bonus(player_id)
    }

    fn has_started(&self, player_id: i32) -> bool {
        self.stats
            .fixtures(player_id)
            .iter()
            .any(|fixture_id| self.started.contains(fixture_id))
    }

    pub fn score(&self, selection: &ManagerPicks) -> LiveScore {
        let lineup = resolve_lineup(selection);
        let bench_boost = selection.active_chip == Some(Chip::BenchBoost);
        let triple_captain = selection.active_chip == Some(Chip::TripleCaptain);

        let mut picks = Vec::with_capacity(lineup.len());
        let mut gameweek_points = 0;
        let mut bonus_points = 0;
        let mut players_started = 0;

        for slot in &lineup {
            let pick = slot.pick;
            let counted = pick.is_starter() || bench_boost;

            let multiplier = if !counted {
                0
            } else if !pick.is_starter() {
                pick.multiplier.max(1)
            } else if triple_captain && pick.is_captain {
                3
            } else {
                pick.multiplier
            };

            let base_points = self.stats.base_points(pick.element);
            let bonus = self.provisional_bonus(pick.element);
            let points = (base_points + bonus) * multiplier;

            if counted {
                gameweek_points += points;
                bonus_points += bonus * multiplier;
                if self.has_started(pick.element) {
                    players_started += 1;
                }
            }

            picks.push(PickScore {
                element: pick.element,
                position: pick.position,
                multiplier,
                minutes: self.stats.minutes(pick.element),
                base_points,
                bonus_points: bonus,
                points,
                counted,
                subbed_in: slot.subbed_in,
                subbed_out: slot.subbed_out,
            });
        }

        let history = &selection.entry_history;
        LiveScore {
            gameweek_points,
            bonus_points,
            total_points: history.total_points - history.points + gameweek_points,
            players_started,
            picks,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LineupSlot {
    pick: Pick,
    subbed_in: bool,
    subbed_out: bool,
}

/// Apply recorded automatic substitutions to the selection.
///
/// The substitution list is authoritative; eligibility is never recomputed
/// from minutes. A swap the upstream already reflected in the positions is
/// only flagged.
fn resolve_lineup(selection: &ManagerPicks) -> Vec<LineupSlot> {
    let mut lineup: Vec<LineupSlot> = selection
        .picks
        .iter()
        .map(|&pick| LineupSlot {
            pick,
            subbed_in: false,
            subbed_out: false,
        })
        .collect();

    for sub in &selection.automatic_subs {
        let out_idx = lineup.iter().position(|s| s.pick.element == sub.element_out);
        let in_idx = lineup.iter().position(|s| s.pick.element == sub.element_in);

        let (Some(out_idx), Some(in_idx)) = (out_idx, in_idx) else {
            tracing::debug!(
                element_in = sub.element_in,
                element_out = sub.element_out,
                "Automatic substitution refers to a player outside the squad"
            );
            continue;
        };

        if lineup[out_idx].pick.is_starter() && !lineup[in_idx].pick.is_starter() {
            let out_position = lineup[out_idx].pick.position;
            let in_position = lineup[in_idx].pick.position;

            lineup[in_idx].pick.position = out_position;
            lineup[in_idx].pick.multiplier = 1;
            lineup[out_idx].pick.position = in_position;
            lineup[out_idx].pick.multiplier = 0;
        }

        lineup[in_idx].subbed_in = true;
        lineup[out_idx].subbed_out = true;
    }

    lineup.sort_by_key(|slot| slot.pick.position);
    lineup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fpl::{
        AutoSub, EntryHistory, Explain, ExplainStat, FixtureStat, FixtureStatValue, LiveElement,
        LiveStats,
    };

    fn live_element(id: i32, minutes: i32, points: i32) -> LiveElement {
        let mut stats = vec![ExplainStat {
            identifier: "minutes".to_string(),
            value: minutes,
            points: if minutes > 0 { 2.min(points) } else { 0 },
        }];
        if points > 2 {
            stats.push(ExplainStat {
                identifier: "goals_scored".to_string(),
                value: 1,
                points: points - 2,
            });
        }
        LiveElement {
            id,
            stats: LiveStats {
                minutes,
                total_points: points,
                ..Default::default()
            },
            explain: if minutes > 0 {
                vec![Explain { fixture: 1, stats }]
            } else {
                vec![]
            },
        }
    }

    fn squad(captain: i32) -> Vec<Pick> {
        (1..=15)
            .map(|n| Pick {
                element: n,
                position: n,
                multiplier: if n > 11 {
                    0
                } else if n == captain {
                    2
                } else {
                    1
                },
                is_captain: n == captain,
                is_vice_captain: false,
            })
            .collect()
    }

    fn gameweek(points: impl Fn(i32) -> i32) -> GameweekLive {
        let live = LiveEvent {
            elements: (1..=15).map(|id| live_element(id, 90, points(id))).collect(),
        };
        let fixtures = vec![Fixture {
            id: 1,
            started: Some(true),
            ..Default::default()
        }];
        GameweekLive::build(10, &live, &fixtures)
    }

    fn selection(picks: Vec<Pick>) -> ManagerPicks {
        ManagerPicks {
            picks,
            entry_history: EntryHistory {
                event: 10,
                points: 40,
                total_points: 500,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_multiplier_one_sums_starting_eleven() {
        let gw = gameweek(|id| id);
        let mut picks = squad(0);
        for pick in picks.iter_mut() {
            pick.multiplier = if pick.position <= 11 { 1 } else { 0 };
        }

        let score = gw.score(&selection(picks));
        assert_eq!(score.gameweek_points, (1..=11).sum::<i32>());
        assert_eq!(score.players_started, 11);
    }

    #[test]
    fn test_captain_doubles_only_their_contribution() {
        let gw = gameweek(|id| id + 2);
        let plain = gw.score(&selection(squad(0))).gameweek_points;
        let captained = gw.score(&selection(squad(4))).gameweek_points;

        assert_eq!(captained - plain, gw.player_points(4));
    }

    #[test]
    fn test_triple_captain_forces_three() {
        let gw = gameweek(|_| 5);
        let mut picks = selection(squad(7));
        picks.active_chip = Some(Chip::TripleCaptain);

        let score = gw.score(&picks);
        let captain = score.picks.iter().find(|p| p.element == 7).unwrap();
        assert_eq!(captain.multiplier, 3);
        assert_eq!(captain.points, 15);
        assert_eq!(score.gameweek_points, 10 * 5 + 15);
    }

    #[test]
    fn test_bench_boost_counts_all_fifteen() {
        let gw = gameweek(|_| 2);
        let mut picks = selection(squad(0));
        picks.active_chip = Some(Chip::BenchBoost);

        let score = gw.score(&picks);
        assert!(score.picks.iter().all(|p| p.counted));
        assert_eq!(score.gameweek_points, 15 * 2);
    }

    #[test]
    fn test_bench_excluded_without_boost() {
        let gw = gameweek(|id| if id > 11 { 10 } else { 1 });
        let score = gw.score(&selection(squad(0)));
        assert_eq!(score.gameweek_points, 11);
    }

    #[test]
    fn test_goalkeeper_autosub_scores_the_replacement() {
        let mut elements: Vec<LiveElement> =
            (2..=15).map(|id| live_element(id, 90, 2)).collect();
        elements.push(live_element(1, 0, 0));
        elements.retain(|e| e.id != 12);
        elements.push(live_element(12, 90, 6));
        let gw = GameweekLive::build(
            10,
            &LiveEvent { elements },
            &[Fixture {
                id: 1,
                started: Some(true),
                ..Default::default()
            }],
        );

        let mut picks = selection(squad(0));
        picks.automatic_subs = vec![AutoSub {
            entry: 1,
            element_in: 12,
            element_out: 1,
            event: 10,
        }];

        let score = gw.score(&picks);
        let keeper = score.picks.iter().find(|p| p.element == 12).unwrap();
        assert_eq!(keeper.position, 1);
        assert!(keeper.counted);
        assert!(keeper.subbed_in);
        assert_eq!(keeper.points, 6);
        assert_eq!(score.gameweek_points, 6 + 10 * 2);

        let benched = score.picks.iter().find(|p| p.element == 1).unwrap();
        assert!(benched.subbed_out);
        assert!(!benched.counted);
    }

    #[test]
    fn test_autosub_already_applied_is_not_swapped_back() {
        let gw = gameweek(|_| 3);
        let mut picks = squad(0);
        picks[0].position = 12;
        picks[0].multiplier = 0;
        picks[11].position = 1;
        picks[11].multiplier = 1;

        let mut selection = selection(picks);
        selection.automatic_subs = vec![AutoSub {
            entry: 1,
            element_in: 12,
            element_out: 1,
            event: 10,
        }];

        let score = gw.score(&selection);
        let keeper = score.picks.iter().find(|p| p.element == 12).unwrap();
        assert_eq!(keeper.position, 1);
        assert!(keeper.counted);
        assert_eq!(score.gameweek_points, 11 * 3);
    }

    #[test]
    fn test_provisional_bonus_is_multiplied() {
        let live = LiveEvent {
            elements: (1..=15).map(|id| live_element(id, 90, 2)).collect(),
        };
        let fixtures = vec![Fixture {
            id: 1,
            started: Some(true),
            stats: vec![FixtureStat {
                identifier: "bps".to_string(),
                h: vec![
                    FixtureStatValue { element: 3, value: 40 },
                    FixtureStatValue { element: 5, value: 30 },
                ],
                a: vec![FixtureStatValue { element: 6, value: 20 }],
            }],
            ..Default::default()
        }];
        let gw = GameweekLive::build(10, &live, &fixtures);

        let score = gw.score(&selection(squad(3)));
        let captain = score.picks.iter().find(|p| p.element == 3).unwrap();
        assert_eq!(captain.bonus_points, 3);
        assert_eq!(captain.points, (2 + 3) * 2);
        assert_eq!(score.bonus_points, 3 * 2 + 2 + 1);
    }

    #[test]
    fn test_total_swaps_recorded_gameweek_points_for_live() {
        let gw = gameweek(|_| 4);
        let score = gw.score(&selection(squad(0)));
        assert_eq!(score.gameweek_points, 44);
        assert_eq!(score.total_points, 500 - 40 + 44);
    }
}
