//! Provisional bonus points derived from in-play BPS.
//!
//! Tiers are awarded by distinct BPS value: everyone at the top value gets 3.
//! While fewer than three players have been awarded, the next distinct value
//! is awarded too: 2 points each, or 1 point each when exactly two players
//! already share the top tier. A final third tier pays 1 point each if the
//! award count is still below three.

use std::collections::HashMap;

use crate::models::live::BonusAward;
use crate::services::stats::FixtureBps;

const BONUS_SLOTS: usize = 3;

/// Bonus awards for one fixture; `scores` are (player id, bps) pairs.
/// Players without an award are absent from the result.
pub fn compute_fixture_bonus(fixture_id: i32, scores: &[(i32, i32)]) -> Vec<BonusAward> {
    let mut sorted = scores.to_vec();
    // Player id tiebreak keeps the output stable however the feed orders ties
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut tiers: Vec<(i32, Vec<i32>)> = Vec::new();
    for (player_id, bps) in sorted {
        match tiers.last_mut() {
            Some((value, players)) if *value == bps => players.push(player_id),
            _ => tiers.push((bps, vec![player_id])),
        }
    }

    let mut awards: Vec<BonusAward> = Vec::new();
    let award = |players: &[i32], points: i32, awards: &mut Vec<BonusAward>| {
        awards.extend(players.iter().map(|&player_id| BonusAward {
            fixture_id,
            player_id,
            points,
        }));
    };

    let mut tiers = tiers.into_iter();

    let Some((_, first)) = tiers.next() else {
        return awards;
    };
    award(&first, 3, &mut awards);

    if awards.len() < BONUS_SLOTS {
        if let Some((_, second)) = tiers.next() {
            let points = if awards.len() == 2 { 1 } else { 2 };
            award(&second, points, &mut awards);

            if awards.len() < BONUS_SLOTS {
                if let Some((_, third)) = tiers.next() {
                    award(&third, 1, &mut awards);
                }
            }
        }
    }

    awards
}

/// Bonus awards for every fixture of a gameweek, keyed by (fixture, player)
#[derive(Debug, Clone, Default)]
pub struct BonusTable {
    awards: HashMap<(i32, i32), BonusAward>,
    by_fixture: Vec<(i32, Vec<BonusAward>)>,
}

impl BonusTable {
    pub fn from_fixtures(fixtures: &[FixtureBps]) -> Self {
        let mut table = BonusTable::default();

        for fixture in fixtures {
            let awards = compute_fixture_bonus(fixture.fixture_id, &fixture.scores);
            for award in &awards {
                table
                    .awards
                    .insert((award.fixture_id, award.player_id), *award);
            }
            if !awards.is_empty() {
                table.by_fixture.push((fixture.fixture_id, awards));
            }
        }

        table.by_fixture.sort_by_key(|(fixture_id, _)| *fixture_id);
        table
    }

    pub fn points(&self, fixture_id: i32, player_id: i32) -> i32 {
        self.awards
            .get(&(fixture_id, player_id))
            .map(|award| award.points)
            .unwrap_or(0)
    }

    /// Provisional bonus for a player summed over the fixtures they appeared in
    pub fn points_for_player(&self, player_id: i32, fixtures: &[i32]) -> i32 {
        fixtures
            .iter()
            .map(|&fixture_id| self.points(fixture_id, player_id))
            .sum()
    }

    pub fn awards_for_player(&self, player_id: i32, fixtures: &[i32]) -> Vec<BonusAward> {
        fixtures
            .iter()
            .filter_map(|&fixture_id| self.awards.get(&(fixture_id, player_id)).copied())
            .collect()
    }

    pub fn fixtures(&self) -> impl Iterator<Item = (i32, &[BonusAward])> {
        self.by_fixture
            .iter()
            .map(|(fixture_id, awards)| (*fixture_id, awards.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points_by_player(awards: &[BonusAward]) -> HashMap<i32, i32> {
        awards.iter().map(|a| (a.player_id, a.points)).collect()
    }

    #[test]
    fn test_single_leader_then_shared_second() {
        let awards = compute_fixture_bonus(1, &[(1, 40), (2, 30), (3, 30), (4, 20)]);
        let points = points_by_player(&awards);

        assert_eq!(points.get(&1), Some(&3));
        assert_eq!(points.get(&2), Some(&2));
        assert_eq!(points.get(&3), Some(&2));
        assert_eq!(points.get(&4), None);
        assert_eq!(awards.len(), 3);
    }

    #[test]
    fn test_shared_lead_gets_three_and_no_twos() {
        let awards = compute_fixture_bonus(1, &[(1, 35), (2, 35), (3, 20), (4, 10)]);
        let points = points_by_player(&awards);

        assert_eq!(points.get(&1), Some(&3));
        assert_eq!(points.get(&2), Some(&3));
        assert!(!awards.iter().any(|a| a.points == 2));
        // the single remaining slot pays 1
        assert_eq!(points.get(&3), Some(&1));
        assert_eq!(points.get(&4), None);
    }

    #[test]
    fn test_three_way_lead_takes_every_slot() {
        let awards = compute_fixture_bonus(1, &[(1, 50), (2, 50), (3, 50), (4, 49)]);
        assert_eq!(awards.len(), 3);
        assert!(awards.iter().all(|a| a.points == 3));
    }

    #[test]
    fn test_distinct_top_three() {
        let awards = compute_fixture_bonus(1, &[(1, 40), (2, 30), (3, 20), (4, 10)]);
        let points = points_by_player(&awards);

        assert_eq!(points, HashMap::from([(1, 3), (2, 2), (3, 1)]));
    }

    #[test]
    fn test_shared_third_place() {
        let awards = compute_fixture_bonus(1, &[(1, 40), (2, 30), (3, 20), (4, 20)]);
        let points = points_by_player(&awards);

        assert_eq!(points, HashMap::from([(1, 3), (2, 2), (3, 1), (4, 1)]));
    }

    #[test]
    fn test_tie_handling_is_order_independent() {
        let scores = vec![(7, 33), (3, 41), (9, 33), (1, 41), (4, 12), (6, 27)];
        let expected = compute_fixture_bonus(5, &scores);

        let mut rotated = scores.clone();
        for _ in 0..scores.len() {
            rotated.rotate_left(1);
            assert_eq!(compute_fixture_bonus(5, &rotated), expected);
        }

        let mut reversed = scores;
        reversed.reverse();
        assert_eq!(compute_fixture_bonus(5, &reversed), expected);
    }

    #[test]
    fn test_no_bps_means_no_awards() {
        assert!(compute_fixture_bonus(1, &[]).is_empty());
    }

    #[test]
    fn test_fixtures_do_not_share_tiers() {
        let table = BonusTable::from_fixtures(&[
            FixtureBps {
                fixture_id: 1,
                scores: vec![(10, 50), (11, 20)],
            },
            FixtureBps {
                fixture_id: 2,
                scores: vec![(20, 25), (21, 24)],
            },
        ]);

        assert_eq!(table.points(1, 10), 3);
        assert_eq!(table.points(2, 20), 3);
        assert_eq!(table.points(2, 21), 2);
        assert_eq!(table.points(1, 20), 0);
        assert_eq!(table.points_for_player(20, &[1, 2]), 3);
        assert_eq!(table.fixtures().count(), 2);
    }
}
