use serde::Serialize;

/// Values are in tenths of a million, as upstream reports them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamValueEntry {
    pub entry: i32,
    pub player_name: String,
    pub team_value: i32,
    pub trend_value: i32,
    pub trend: i32,
    pub bank: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamValueResponse {
    pub gameweek: i32,
    pub trend_gameweek: i32,
    pub managers: Vec<TeamValueEntry>,
    pub skipped_managers: Vec<i32>,
}
