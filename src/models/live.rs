use serde::{Deserialize, Serialize};

use crate::models::common::{ManagerSummary, PlayerSummary};
use crate::models::fpl::Chip;

/// Provisional bonus for one player in one fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusAward {
    pub fixture_id: i32,
    pub player_id: i32,
    pub points: i32,
}

/// One pick's contribution to a manager's live gameweek score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickScore {
    pub element: i32,
    pub position: i32,
    pub multiplier: i32,
    pub minutes: i32,
    /// Statistic points without bonus, before the multiplier
    pub base_points: i32,
    /// Provisional bonus, before the multiplier
    pub bonus_points: i32,
    /// (base + bonus) * multiplier when the pick counts, otherwise 0
    pub points: i32,
    pub counted: bool,
    pub subbed_in: bool,
    pub subbed_out: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveScore {
    pub gameweek_points: i32,
    /// Multiplied bonus included in `gameweek_points`
    pub bonus_points: i32,
    /// Season total with this gameweek's recorded points swapped for the live figure
    pub total_points: i32,
    pub players_started: usize,
    pub picks: Vec<PickScore>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusWinner {
    pub fixture_id: i32,
    pub points: i32,
    pub player: PlayerSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureBonus {
    pub fixture_id: i32,
    pub winners: Vec<BonusWinner>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerLiveEntry {
    pub live_rank: usize,
    pub manager: ManagerSummary,
    pub active_chip: Option<Chip>,
    pub gameweek_points: i32,
    pub bonus_points: i32,
    pub total_points: i32,
    pub players_started: usize,
    pub bonus_players: Vec<BonusWinner>,
    pub picks: Vec<PickScore>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveTableResponse {
    pub league_id: i32,
    pub league_name: String,
    pub gameweek: i32,
    pub managers: Vec<ManagerLiveEntry>,
    pub bonus: Vec<FixtureBonus>,
    /// Managers whose data could not be fetched and were left out
    pub skipped_managers: Vec<i32>,
}
