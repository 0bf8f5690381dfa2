use serde::Serialize;

use crate::models::fpl::Chip;

/// One chip played by one manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipPlay {
    pub entry: i32,
    pub gameweek: i32,
    pub chip: Chip,
    /// Points attributed to the chip for that gameweek
    pub points: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChipStatus {
    No,
    Yes,
    Current,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipGraphEntry {
    pub entry: i32,
    pub name: String,
    pub point: i32,
    pub gameweek: Option<i32>,
    pub status: ChipStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipSummary {
    pub chip: Chip,
    pub users: usize,
    /// Share of the league that has played the chip, 0.0 - 1.0
    pub usage_share: f64,
    /// Average points over all plays of the chip, 0.0 when unplayed
    pub average_points: f64,
    pub graph: Vec<ChipGraphEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipViewResponse {
    pub gameweek: i32,
    pub league_size: usize,
    pub chips: Vec<ChipSummary>,
    pub skipped_managers: Vec<i32>,
}
