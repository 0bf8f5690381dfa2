use serde::{Deserialize, Serialize};

use crate::models::common::PlayerSummary;
use crate::models::fpl::Chip;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTransfer {
    pub entry: i32,
    pub gameweek: i32,
    pub element_in: PlayerSummary,
    pub element_out: PlayerSummary,
    pub element_in_cost: i32,
    pub element_out_cost: i32,
    pub element_in_points: i32,
    pub element_out_points: i32,
    pub point_difference: i32,
    /// True when the pair was derived from a squad diff rather than the transfer log
    pub inferred: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerTransfers {
    pub entry: i32,
    pub entry_name: String,
    pub player_name: String,
    pub active_chip: Option<Chip>,
    pub event_transfers: i32,
    pub event_transfers_cost: i32,
    pub transfers: Vec<EnrichedTransfer>,
    /// Sum of point differences minus the transfer cost
    pub transfer_result: i32,
    /// Data-integrity fault found while pairing a wildcard/free-hit squad
    pub fault: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferViewResponse {
    pub gameweek: i32,
    pub managers: Vec<ManagerTransfers>,
    pub skipped_managers: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    In,
    Out,
}

impl TransferDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "in" => Some(TransferDirection::In),
            "out" => Some(TransferDirection::Out),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferTally {
    pub player: PlayerSummary,
    pub managers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferTallyResponse {
    pub direction: TransferDirection,
    pub from_gameweek: i32,
    pub to_gameweek: i32,
    pub players: Vec<TransferTally>,
}
