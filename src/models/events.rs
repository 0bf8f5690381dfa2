use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::common::{ManagerSummary, PlayerSummary};

pub const MINUTES_IDENTIFIER: &str = "minutes";
pub const BONUS_IDENTIFIER: &str = "bonus";
pub const BPS_IDENTIFIER: &str = "bps";

/// Natural key of a persisted event: one row per gameweek, player and statistic
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventKey {
    pub gameweek: i32,
    pub player_id: i32,
    pub identifier: String,
}

/// One player's statistic line for a gameweek, as read from the live feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFixtureStat {
    pub gameweek: i32,
    pub player_id: i32,
    pub fixture_id: i32,
    pub identifier: String,
    pub value: i32,
    pub points: i32,
    /// Value reported by the latest fixture that moved it. Equals `value`
    /// unless a double gameweek merged several fixtures into this line.
    pub fixture_value: i32,
    /// Player's gameweek minutes when the line was captured
    pub minutes: i32,
    /// Player's gameweek total points when the line was captured
    pub total_points: i32,
}

impl PlayerFixtureStat {
    pub fn key(&self) -> EventKey {
        EventKey {
            gameweek: self.gameweek,
            player_id: self.player_id,
            identifier: self.identifier.clone(),
        }
    }
}

/// Persisted event row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub gameweek: i32,
    pub player_id: i32,
    pub identifier: String,
    pub value: i32,
    pub points: i32,
    pub fixture_id: i32,
    pub minutes_at_capture: i32,
    pub total_points_at_capture: i32,
    pub event_date: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl EventRecord {
    pub fn key(&self) -> EventKey {
        EventKey {
            gameweek: self.gameweek,
            player_id: self.player_id,
            identifier: self.identifier.clone(),
        }
    }
}

/// Counts of rows touched by one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub gameweek: i32,
    pub inserted: u64,
    pub updated: u64,
    pub deleted: u64,
    pub unchanged: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    pub gameweek: Option<i32>,
}

/// Persisted event enriched for a league feed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaguePlayerEvent {
    #[serde(flatten)]
    pub event: EventRecord,
    pub player: PlayerSummary,
    pub managers: Vec<ManagerSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEventsResponse {
    pub gameweek: i32,
    pub refresh: Option<ReconcileReport>,
    pub events: Vec<LeaguePlayerEvent>,
}
