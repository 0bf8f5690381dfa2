use std::collections::HashMap;

use crate::models::common::{ManagerSummary, PlayerSummary};
use crate::models::fpl::{BootstrapStatic, Element, StandingEntry};

const PLAYER_IMG_BASE_URL: &str =
    "https://resources.premierleague.com/premierleague/photos/players/250x250/p";
const TEAM_BADGE_BASE_URL: &str = "https://resources.premierleague.com/premierleague/badges/70/t";
const PLAYER_PLACEHOLDER_IMG: &str = "/player-loading.svg";

pub const UNKNOWN_PLAYER: &str = "Unknown Player";

/// Playing position, from the bootstrap `element_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayingPosition {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl PlayingPosition {
    pub fn from_element_type(element_type: i32) -> Option<Self> {
        match element_type {
            1 => Some(PlayingPosition::Goalkeeper),
            2 => Some(PlayingPosition::Defender),
            3 => Some(PlayingPosition::Midfielder),
            4 => Some(PlayingPosition::Forward),
            _ => None,
        }
    }
}

/// Keyed lookup over bootstrap players and teams, built once per request
#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    players: HashMap<i32, Element>,
    team_codes: HashMap<i32, i32>,
}

impl PlayerDirectory {
    pub fn from_bootstrap(bootstrap: &BootstrapStatic) -> Self {
        Self {
            players: bootstrap
                .elements
                .iter()
                .map(|element| (element.id, element.clone()))
                .collect(),
            team_codes: bootstrap.teams.iter().map(|team| (team.id, team.code)).collect(),
        }
    }

    pub fn get(&self, id: i32) -> Option<&Element> {
        self.players.get(&id)
    }

    pub fn position_of(&self, id: i32) -> Option<PlayingPosition> {
        self.get(id)
            .and_then(|element| PlayingPosition::from_element_type(element.element_type))
    }

    /// Summary for `id`, or an "Unknown Player" placeholder when the
    /// reference data does not know the player
    pub fn summary(&self, id: i32) -> PlayerSummary {
        match self.get(id) {
            Some(element) => PlayerSummary {
                id,
                web_name: element.web_name.clone(),
                full_name: format!("{} {}", element.first_name, element.second_name)
                    .trim()
                    .to_string(),
                team: element.team,
                team_code: element.team_code,
                element_type: element.element_type,
                now_cost: element.now_cost,
                photo_url: image_link(&element.photo),
                badge_url: self.team_badge(element.team),
            },
            None => {
                tracing::debug!("No reference data for player {}", id);
                PlayerSummary {
                    id,
                    web_name: UNKNOWN_PLAYER.to_string(),
                    full_name: UNKNOWN_PLAYER.to_string(),
                    team: 0,
                    team_code: 0,
                    element_type: 0,
                    now_cost: 0,
                    photo_url: PLAYER_PLACEHOLDER_IMG.to_string(),
                    badge_url: None,
                }
            }
        }
    }

    pub fn now_cost(&self, id: i32) -> i32 {
        self.get(id).map(|element| element.now_cost).unwrap_or(0)
    }

    pub fn team_badge(&self, team_id: i32) -> Option<String> {
        self.team_codes
            .get(&team_id)
            .map(|code| format!("{}{}.png", TEAM_BADGE_BASE_URL, code))
    }
}

/// Photo ids arrive as "12345.jpg"; the CDN serves "p12345.png"
pub fn image_link(photo: &str) -> String {
    match photo.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => format!("{}{}.png", PLAYER_IMG_BASE_URL, stem),
        _ => PLAYER_PLACEHOLDER_IMG.to_string(),
    }
}

pub fn manager_summary(entry: &StandingEntry) -> ManagerSummary {
    ManagerSummary {
        entry: entry.entry,
        entry_name: entry.entry_name.clone(),
        player_name: entry.player_name.clone(),
        rank: entry.rank,
        total: entry.total,
    }
}
