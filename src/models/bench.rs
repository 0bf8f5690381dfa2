use serde::Serialize;

use crate::models::common::PlayerSummary;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchPlayer {
    pub position: i32,
    pub player: PlayerSummary,
    pub points: i32,
    pub minutes: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSubView {
    pub element_in: PlayerSummary,
    pub element_in_points: i32,
    pub element_out: PlayerSummary,
    pub element_out_points: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerBench {
    pub entry: i32,
    pub entry_name: String,
    pub player_name: String,
    /// Points left on the bench, zero when bench boost counted them
    pub points_on_bench: i32,
    pub bench: Vec<BenchPlayer>,
    pub auto_subs: Vec<AutoSubView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchViewResponse {
    pub gameweek: i32,
    pub managers: Vec<ManagerBench>,
    pub skipped_managers: Vec<i32>,
}
