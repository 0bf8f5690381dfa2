use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Player reference attached to every view that mentions a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: i32,
    pub web_name: String,
    pub full_name: String,
    pub team: i32,
    pub team_code: i32,
    pub element_type: i32,
    pub now_cost: i32,
    pub photo_url: String,
    /// Club badge; absent when the player's team is unknown
    pub badge_url: Option<String>,
}

/// Manager as listed in the league standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSummary {
    pub entry: i32,
    pub entry_name: String,
    pub player_name: String,
    pub rank: i32,
    pub total: i32,
}
