//! Raw-stat normalization over the live event feed.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::events::{
    EventKey, PlayerFixtureStat, BONUS_IDENTIFIER, BPS_IDENTIFIER, MINUTES_IDENTIFIER,
};
use crate::models::fpl::{Fixture, LiveEvent};

/// A statistic that neither scored nor moved is not worth persisting,
/// except minutes which track a player's progress through the match
fn is_noop(identifier: &str, value: i32, points: i32) -> bool {
    value == 0 && points == 0 && identifier != MINUTES_IDENTIFIER
}

/// Flatten the live feed into one line per (gameweek, player, identifier).
///
/// Double-gameweek players report the same identifier once per fixture;
/// those lines are merged so the composite key stays unique.
pub fn flatten_live_event(gameweek: i32, live: &LiveEvent) -> Vec<PlayerFixtureStat> {
    let mut merged: BTreeMap<EventKey, PlayerFixtureStat> = BTreeMap::new();

    for element in &live.elements {
        let mut explains: Vec<_> = element.explain.iter().collect();
        explains.sort_by_key(|explain| explain.fixture);

        for explain in explains {
            for stat in &explain.stats {
                if is_noop(&stat.identifier, stat.value, stat.points) {
                    continue;
                }

                let line = PlayerFixtureStat {
                    gameweek,
                    player_id: element.id,
                    fixture_id: explain.fixture,
                    identifier: stat.identifier.clone(),
                    value: stat.value,
                    points: stat.points,
                    fixture_value: stat.value,
                    minutes: element.stats.minutes,
                    total_points: element.stats.total_points,
                };

                merged
                    .entry(line.key())
                    .and_modify(|existing| {
                        existing.value += line.value;
                        existing.points += line.points;
                        existing.fixture_id = line.fixture_id;
                        if line.value != 0 {
                            existing.fixture_value = line.value;
                        }
                    })
                    .or_insert(line);
            }
        }
    }

    merged.into_values().collect()
}

/// Live figures for one player across all of the gameweek's fixtures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerLive {
    pub minutes: i32,
    /// Sum of explained statistic points, confirmed bonus excluded
    pub base_points: i32,
    pub total_points: i32,
    pub fixtures: Vec<i32>,
}

/// Keyed view of the live feed, built once per request
#[derive(Debug, Clone, Default)]
pub struct LiveStatsIndex {
    players: HashMap<i32, PlayerLive>,
}

impl LiveStatsIndex {
    pub fn from_live(live: &LiveEvent) -> Self {
        let players = live
            .elements
            .iter()
            .map(|element| {
                let base_points = element
                    .explain
                    .iter()
                    .flat_map(|explain| explain.stats.iter())
                    .filter(|stat| stat.identifier != BONUS_IDENTIFIER)
                    .map(|stat| stat.points)
                    .sum();

                let mut fixtures: Vec<i32> =
                    element.explain.iter().map(|explain| explain.fixture).collect();
                fixtures.sort_unstable();
                fixtures.dedup();

                (
                    element.id,
                    PlayerLive {
                        minutes: element.stats.minutes,
                        base_points,
                        total_points: element.stats.total_points,
                        fixtures,
                    },
                )
            })
            .collect();

        Self { players }
    }

    pub fn get(&self, player_id: i32) -> Option<&PlayerLive> {
        self.players.get(&player_id)
    }

    pub fn minutes(&self, player_id: i32) -> i32 {
        self.get(player_id).map(|p| p.minutes).unwrap_or(0)
    }

    pub fn base_points(&self, player_id: i32) -> i32 {
        self.get(player_id).map(|p| p.base_points).unwrap_or(0)
    }

    pub fn total_points(&self, player_id: i32) -> i32 {
        self.get(player_id).map(|p| p.total_points).unwrap_or(0)
    }

    pub fn fixtures(&self, player_id: i32) -> &[i32] {
        self.get(player_id)
            .map(|p| p.fixtures.as_slice())
            .unwrap_or(&[])
    }
}

/// BPS scores of one fixture, home and away combined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureBps {
    pub fixture_id: i32,
    /// (player id, bps)
    pub scores: Vec<(i32, i32)>,
}

/// Collect per-fixture BPS from the fixtures feed. Fixtures without any
/// BPS data are left out, so they award no bonus.
pub fn fixture_bps(fixtures: &[Fixture]) -> Vec<FixtureBps> {
    fixtures
        .iter()
        .filter_map(|fixture| {
            let scores: Vec<(i32, i32)> = fixture
                .stats
                .iter()
                .filter(|stat| stat.identifier == BPS_IDENTIFIER)
                .flat_map(|stat| stat.h.iter().chain(stat.a.iter()))
                .map(|entry| (entry.element, entry.value))
                .collect();

            if scores.is_empty() {
                None
            } else {
                Some(FixtureBps {
                    fixture_id: fixture.id,
                    scores,
                })
            }
        })
        .collect()
}

pub fn started_fixtures(fixtures: &[Fixture]) -> HashSet<i32> {
    fixtures
        .iter()
        .filter(|fixture| fixture.has_started())
        .map(|fixture| fixture.id)
        .collect()
}
