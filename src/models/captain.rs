use serde::Serialize;

use crate::models::common::{ManagerSummary, PlayerSummary};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptainPick {
    pub player: PlayerSummary,
    pub times_picked: usize,
    /// Captain's own gameweek points, before any multiplier
    pub captain_points: i32,
    pub managers: Vec<ManagerSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptainViewResponse {
    pub gameweek: i32,
    pub captains: Vec<CaptainPick>,
    pub skipped_managers: Vec<i32>,
}
