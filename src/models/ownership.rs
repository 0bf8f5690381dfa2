use serde::Serialize;

use crate::models::common::{ManagerSummary, PlayerSummary};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedPlayer {
    pub player: PlayerSummary,
    pub ownership: usize,
    pub managers: Vec<ManagerSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MostOwnedResponse {
    pub gameweek: i32,
    pub league_name: String,
    pub players: Vec<OwnedPlayer>,
    pub skipped_managers: Vec<i32>,
}
