//! Typed payloads of the upstream fantasy API.
//!
//! Only the fields the dashboard reads are modelled; everything else in the
//! upstream JSON is ignored by serde.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// bootstrap-static
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootstrapStatic {
    #[serde(default)]
    pub events: Vec<GameweekInfo>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl BootstrapStatic {
    /// Gameweek flagged as current upstream, 1 before the season starts
    pub fn current_gameweek(&self) -> i32 {
        self.events
            .iter()
            .find(|event| event.is_current)
            .map(|event| event.id)
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameweekInfo {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
    #[serde(default)]
    pub finished: bool,
    pub deadline_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Team {
    pub id: i32,
    pub code: i32,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Element {
    pub id: i32,
    pub web_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub second_name: String,
    pub team: i32,
    #[serde(default)]
    pub team_code: i32,
    pub element_type: i32,
    #[serde(default)]
    pub now_cost: i32,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub total_points: i32,
}

// ---------------------------------------------------------------------------
// leagues-classic/{id}/standings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueStandings {
    pub league: LeagueInfo,
    pub standings: Standings,
}

impl LeagueStandings {
    pub fn entries(&self) -> Vec<i32> {
        self.standings.results.iter().map(|r| r.entry).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueInfo {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Standings {
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub page: i32,
    #[serde(default)]
    pub results: Vec<StandingEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandingEntry {
    pub id: i64,
    pub entry: i32,
    pub entry_name: String,
    pub player_name: String,
    #[serde(default)]
    pub rank: i32,
    #[serde(default)]
    pub last_rank: i32,
    #[serde(default)]
    pub total: i32,
    #[serde(default)]
    pub event_total: i32,
}

// ---------------------------------------------------------------------------
// entry/{id}/history/
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerHistory {
    #[serde(default)]
    pub current: Vec<EntryHistory>,
    #[serde(default)]
    pub chips: Vec<ChipPlayed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipPlayed {
    pub name: Chip,
    pub event: i32,
    #[serde(default)]
    pub time: String,
}

// ---------------------------------------------------------------------------
// entry/{id}/event/{gw}/picks/
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chip {
    #[serde(rename = "wildcard")]
    Wildcard,
    #[serde(rename = "freehit")]
    FreeHit,
    #[serde(rename = "bboost")]
    BenchBoost,
    #[serde(rename = "3xc")]
    TripleCaptain,
    #[serde(rename = "other", other)]
    Other,
}

impl Chip {
    pub const TRACKED: [Chip; 4] = [
        Chip::Wildcard,
        Chip::FreeHit,
        Chip::BenchBoost,
        Chip::TripleCaptain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chip::Wildcard => "wildcard",
            Chip::FreeHit => "freehit",
            Chip::BenchBoost => "bboost",
            Chip::TripleCaptain => "3xc",
            Chip::Other => "other",
        }
    }

    /// Chips that allow the whole squad to be replaced without logged transfers
    pub fn replaces_squad(&self) -> bool {
        matches!(self, Chip::Wildcard | Chip::FreeHit)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerPicks {
    pub active_chip: Option<Chip>,
    #[serde(default)]
    pub automatic_subs: Vec<AutoSub>,
    pub entry_history: EntryHistory,
    #[serde(default)]
    pub picks: Vec<Pick>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub element: i32,
    pub position: i32,
    pub multiplier: i32,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

impl Pick {
    pub fn is_starter(&self) -> bool {
        self.position <= 11
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSub {
    #[serde(default)]
    pub entry: i32,
    pub element_in: i32,
    pub element_out: i32,
    #[serde(default)]
    pub event: i32,
}

/// Gameweek summary for a manager; `value` and `bank` are in tenths of a million
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryHistory {
    pub event: i32,
    pub points: i32,
    pub total_points: i32,
    pub rank: Option<i32>,
    #[serde(default)]
    pub bank: i32,
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub event_transfers: i32,
    #[serde(default)]
    pub event_transfers_cost: i32,
    #[serde(default)]
    pub points_on_bench: i32,
}

// ---------------------------------------------------------------------------
// entry/{id}/transfers/
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub element_in: i32,
    pub element_in_cost: i32,
    pub element_out: i32,
    pub element_out_cost: i32,
    pub entry: i32,
    pub event: i32,
    #[serde(default)]
    pub time: String,
}

// ---------------------------------------------------------------------------
// event/{gw}/live/
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveEvent {
    #[serde(default)]
    pub elements: Vec<LiveElement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveElement {
    pub id: i32,
    pub stats: LiveStats,
    #[serde(default)]
    pub explain: Vec<Explain>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveStats {
    #[serde(default)]
    pub minutes: i32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub bps: i32,
    #[serde(default)]
    pub bonus: i32,
}

/// Per-fixture breakdown of one player's points
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Explain {
    pub fixture: i32,
    #[serde(default)]
    pub stats: Vec<ExplainStat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainStat {
    pub identifier: String,
    pub points: i32,
    pub value: i32,
}

// ---------------------------------------------------------------------------
// fixtures/?event={gw}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    pub id: i32,
    pub event: Option<i32>,
    #[serde(default)]
    pub started: Option<bool>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub finished_provisional: bool,
    #[serde(default)]
    pub minutes: i32,
    pub team_h: i32,
    pub team_a: i32,
    pub team_h_score: Option<i32>,
    pub team_a_score: Option<i32>,
    #[serde(default, deserialize_with = "lenient_stats")]
    pub stats: Vec<FixtureStat>,
}

impl Fixture {
    pub fn has_started(&self) -> bool {
        self.started.unwrap_or(false)
    }
}

/// Fixture stats with unreadable entries dropped, so one malformed line
/// costs that fixture its bonus instead of failing the whole feed
fn lenient_stats<'de, D>(deserializer: D) -> Result<Vec<FixtureStat>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::warn!(stats = %other, "Fixture stats are not a list, ignoring");
            return Ok(Vec::new());
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<FixtureStat>(entry) {
            Ok(stat) => Some(stat),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed fixture stat");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureStat {
    pub identifier: String,
    #[serde(default)]
    pub a: Vec<FixtureStatValue>,
    #[serde(default)]
    pub h: Vec<FixtureStatValue>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureStatValue {
    pub element: i32,
    pub value: i32,
}

// ---------------------------------------------------------------------------
// element-summary/{id}/
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementSummary {
    #[serde(default)]
    pub history: Vec<ElementGameweek>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementGameweek {
    pub element: i32,
    pub fixture: i32,
    pub round: i32,
    pub total_points: i32,
    #[serde(default)]
    pub minutes: i32,
    #[serde(default)]
    pub value: i32,
}

impl ElementSummary {
    /// Points across every fixture the player had in `round`
    pub fn points_in_round(&self, round: i32) -> Option<i32> {
        let rows: Vec<&ElementGameweek> =
            self.history.iter().filter(|row| row.round == round).collect();
        if rows.is_empty() {
            None
        } else {
            Some(rows.iter().map(|row| row.total_points).sum())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chip_names_deserialize() {
        let chips: Vec<Chip> =
            serde_json::from_str(r#"["wildcard","freehit","bboost","3xc","manager"]"#).unwrap();
        assert_eq!(
            chips,
            vec![
                Chip::Wildcard,
                Chip::FreeHit,
                Chip::BenchBoost,
                Chip::TripleCaptain,
                Chip::Other
            ]
        );
    }

    #[test]
    fn test_picks_payload_with_null_chip() {
        let json = r#"{
            "active_chip": null,
            "automatic_subs": [{"entry": 10, "element_in": 300, "element_out": 1, "event": 5}],
            "entry_history": {"event": 5, "points": 61, "total_points": 302, "rank": null,
                              "bank": 5, "value": 1003, "event_transfers": 1,
                              "event_transfers_cost": 4, "points_on_bench": 3},
            "picks": [{"element": 1, "position": 1, "multiplier": 1,
                       "is_captain": false, "is_vice_captain": false}]
        }"#;
        let picks: ManagerPicks = serde_json::from_str(json).unwrap();
        assert!(picks.active_chip.is_none());
        assert_eq!(picks.automatic_subs[0].element_in, 300);
        assert_eq!(picks.entry_history.event_transfers_cost, 4);
        assert!(picks.picks[0].is_starter());
    }

    #[test]
    fn test_malformed_fixture_stat_is_dropped() {
        let json = r#"[
            {"id": 1, "event": 5, "started": true, "team_h": 1, "team_a": 2,
             "team_h_score": 1, "team_a_score": 0,
             "stats": [{"identifier": "bps", "h": [{"element": 10, "value": 31}], "a": []}]},
            {"id": 2, "event": 5, "started": true, "team_h": 3, "team_a": 4,
             "team_h_score": 0, "team_a_score": 0,
             "stats": [{"identifier": "bps", "h": [{"element": 30, "value": null}], "a": []},
                       {"identifier": "saves", "h": [{"element": 31, "value": 3}], "a": []}]},
            {"id": 3, "event": 5, "started": false, "team_h": 5, "team_a": 6,
             "team_h_score": null, "team_a_score": null, "stats": null}
        ]"#;

        let fixtures: Vec<Fixture> = serde_json::from_str(json).unwrap();
        assert_eq!(fixtures.len(), 3);
        assert_eq!(fixtures[0].stats[0].h[0].value, 31);
        assert_eq!(fixtures[1].stats.len(), 1);
        assert_eq!(fixtures[1].stats[0].identifier, "saves");
        assert!(fixtures[2].stats.is_empty());
    }

    #[test]
    fn test_current_gameweek_defaults_to_one() {
        let bootstrap = BootstrapStatic::default();
        assert_eq!(bootstrap.current_gameweek(), 1);
    }

    #[test]
    fn test_points_in_round_sums_double_gameweeks() {
        let row = |fixture: i32, round: i32, total_points: i32| ElementGameweek {
            element: 7,
            fixture,
            round,
            total_points,
            ..Default::default()
        };
        let summary = ElementSummary {
            history: vec![row(1, 3, 2), row(2, 3, 9), row(3, 4, 1)],
        };
        assert_eq!(summary.points_in_round(3), Some(11));
        assert_eq!(summary.points_in_round(5), None);
    }
}
