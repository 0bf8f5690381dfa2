#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{FixedOffset, TimeZone};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fpl_league_backend::config::DashboardSettings;
use fpl_league_backend::error::{FetchError, StoreError};
use fpl_league_backend::handlers::router;
use fpl_league_backend::models::events::{EventKey, EventRecord, PlayerFixtureStat};
use fpl_league_backend::models::fpl::{
    BootstrapStatic, Element, ElementSummary, EntryHistory, Explain, ExplainStat, Fixture,
    GameweekInfo, LeagueInfo, LeagueStandings, LiveElement, LiveEvent, LiveStats, ManagerHistory,
    ManagerPicks, Pick, StandingEntry, Standings, Team, TransferEvent,
};
use fpl_league_backend::services::event_store::EventStore;
use fpl_league_backend::services::fpl_api::FplApi;
use fpl_league_backend::services::reconciliation::ReconcilePhase;
use fpl_league_backend::AppState;

// ---------------------------------------------------------------------------
// In-memory event store
// ---------------------------------------------------------------------------

/// Event store backed by a map, with an optional phase that always fails
#[derive(Default)]
pub struct MemoryEventStore {
    rows: Mutex<BTreeMap<EventKey, EventRecord>>,
    failing: Mutex<Option<ReconcilePhase>>,
}

impl MemoryEventStore {
    pub fn fail_on(&self, phase: Option<ReconcilePhase>) {
        *self.failing.lock().unwrap() = phase;
    }

    pub fn rows(&self) -> Vec<EventRecord> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn seed(&self, records: Vec<EventRecord>) {
        let mut rows = self.rows.lock().unwrap();
        for record in records {
            rows.insert(record.key(), record);
        }
    }

    fn check(&self, phase: ReconcilePhase) -> Result<(), StoreError> {
        if *self.failing.lock().unwrap() == Some(phase) {
            return Err(StoreError::Backend(format!("{} unavailable", phase)));
        }
        Ok(())
    }
}

fn record_from(stat: &PlayerFixtureStat) -> EventRecord {
    let at = capture_time();
    EventRecord {
        gameweek: stat.gameweek,
        player_id: stat.player_id,
        identifier: stat.identifier.clone(),
        value: stat.value,
        points: stat.points,
        fixture_id: stat.fixture_id,
        minutes_at_capture: stat.minutes,
        total_points_at_capture: stat.total_points,
        event_date: at,
        updated_at: at,
    }
}

pub fn capture_time() -> chrono::DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 9, 14, 15, 30, 0)
        .unwrap()
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn events_for_gameweek(&self, gameweek: i32) -> Result<Vec<EventRecord>, StoreError> {
        self.check(ReconcilePhase::Load)?;
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .filter(|record| record.gameweek == gameweek)
            .cloned()
            .collect())
    }

    async fn insert_events(&self, events: &[PlayerFixtureStat]) -> Result<u64, StoreError> {
        self.check(ReconcilePhase::Insert)?;
        let mut rows = self.rows.lock().unwrap();
        let mut inserted = 0;
        for stat in events {
            if !rows.contains_key(&stat.key()) {
                rows.insert(stat.key(), record_from(stat));
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn update_event(&self, event: &PlayerFixtureStat) -> Result<u64, StoreError> {
        self.check(ReconcilePhase::Update)?;
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&event.key()) {
            Some(record) => {
                record.value = event.value;
                record.points = event.points;
                record.fixture_id = event.fixture_id;
                record.minutes_at_capture = event.minutes;
                record.total_points_at_capture = event.total_points;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_events(&self, keys: &[EventKey]) -> Result<u64, StoreError> {
        self.check(ReconcilePhase::Delete)?;
        let mut rows = self.rows.lock().unwrap();
        Ok(keys.iter().filter(|key| rows.remove(*key).is_some()).count() as u64)
    }
}

// ---------------------------------------------------------------------------
// Stub fantasy API
// ---------------------------------------------------------------------------

/// Serves canned upstream payloads; anything missing answers 404
#[derive(Default)]
pub struct StubFpl {
    pub bootstrap: BootstrapStatic,
    pub leagues: HashMap<i32, LeagueStandings>,
    pub picks: HashMap<(i32, i32), ManagerPicks>,
    pub histories: HashMap<i32, ManagerHistory>,
    pub transfers: HashMap<i32, Vec<TransferEvent>>,
    pub live: HashMap<i32, LiveEvent>,
    pub fixtures: HashMap<i32, Vec<Fixture>>,
    pub summaries: HashMap<i32, ElementSummary>,
}

fn not_found(path: String) -> FetchError {
    FetchError::Status {
        url: format!("https://fpl.test/api/{}", path),
        status: 404,
        body: "Not found.".to_string(),
    }
}

#[async_trait]
impl FplApi for StubFpl {
    async fn bootstrap_static(&self) -> Result<Arc<BootstrapStatic>, FetchError> {
        Ok(Arc::new(self.bootstrap.clone()))
    }

    async fn league_standings(&self, league_id: i32) -> Result<Arc<LeagueStandings>, FetchError> {
        self.leagues
            .get(&league_id)
            .cloned()
            .map(Arc::new)
            .ok_or_else(|| not_found(format!("leagues-classic/{}/standings/", league_id)))
    }

    async fn manager_history(&self, entry: i32) -> Result<ManagerHistory, FetchError> {
        self.histories
            .get(&entry)
            .cloned()
            .ok_or_else(|| not_found(format!("entry/{}/history/", entry)))
    }

    async fn picks(&self, entry: i32, gameweek: i32) -> Result<ManagerPicks, FetchError> {
        self.picks
            .get(&(entry, gameweek))
            .cloned()
            .ok_or_else(|| not_found(format!("entry/{}/event/{}/picks/", entry, gameweek)))
    }

    async fn transfers(&self, entry: i32) -> Result<Vec<TransferEvent>, FetchError> {
        self.transfers
            .get(&entry)
            .cloned()
            .ok_or_else(|| not_found(format!("entry/{}/transfers/", entry)))
    }

    async fn live_event(&self, gameweek: i32) -> Result<Arc<LiveEvent>, FetchError> {
        self.live
            .get(&gameweek)
            .cloned()
            .map(Arc::new)
            .ok_or_else(|| not_found(format!("event/{}/live/", gameweek)))
    }

    async fn fixtures(&self, gameweek: i32) -> Result<Arc<Vec<Fixture>>, FetchError> {
        Ok(Arc::new(self.fixtures.get(&gameweek).cloned().unwrap_or_default()))
    }

    async fn element_summary(&self, element: i32) -> Result<ElementSummary, FetchError> {
        self.summaries
            .get(&element)
            .cloned()
            .ok_or_else(|| not_found(format!("element-summary/{}/", element)))
    }
}

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

pub const GAMEWEEK: i32 = 5;
pub const LEAGUE_ID: i32 = 314;

/// Fifteen players, ids 1..=15: 1 and 12 keepers, the rest outfield
pub fn bootstrap() -> BootstrapStatic {
    BootstrapStatic {
        events: vec![
            GameweekInfo { id: GAMEWEEK - 1, finished: true, ..Default::default() },
            GameweekInfo { id: GAMEWEEK, is_current: true, ..Default::default() },
        ],
        teams: vec![Team {
            id: 1,
            code: 3,
            name: "Arsenal".to_string(),
            short_name: "ARS".to_string(),
        }],
        elements: (1..=15)
            .map(|id| Element {
                id,
                web_name: format!("Player{}", id),
                team: 1,
                team_code: 3,
                element_type: if id == 1 || id == 12 { 1 } else { 3 },
                now_cost: 50 + id,
                photo: format!("{}.jpg", 1000 + id),
                ..Default::default()
            })
            .collect(),
    }
}

pub fn standing(entry: i32, name: &str, total: i32) -> StandingEntry {
    StandingEntry {
        id: entry as i64,
        entry,
        entry_name: format!("{} XI", name),
        player_name: name.to_string(),
        rank: 0,
        last_rank: 0,
        total,
        event_total: 0,
    }
}

pub fn league(entries: Vec<StandingEntry>) -> LeagueStandings {
    LeagueStandings {
        league: LeagueInfo { id: LEAGUE_ID, name: "Office League".to_string() },
        standings: Standings { has_next: false, page: 1, results: entries },
    }
}

/// Standard squad where every player id equals its squad slot
pub fn picks(captain: i32, recorded_points: i32, total_points: i32) -> ManagerPicks {
    ManagerPicks {
        active_chip: None,
        automatic_subs: vec![],
        entry_history: EntryHistory {
            event: GAMEWEEK,
            points: recorded_points,
            total_points,
            value: 1000,
            ..Default::default()
        },
        picks: (1..=15)
            .map(|n| Pick {
                element: n,
                position: n,
                multiplier: if n > 11 {
                    0
                } else if n == captain {
                    2
                } else {
                    1
                },
                is_captain: n == captain,
                is_vice_captain: false,
            })
            .collect(),
    }
}

/// Live element that played 90 minutes in fixture 1 and scored `points`
pub fn live_element(id: i32, points: i32) -> LiveElement {
    let mut stats = vec![ExplainStat {
        identifier: "minutes".to_string(),
        value: 90,
        points: 2.min(points),
    }];
    if points > 2 {
        stats.push(ExplainStat {
            identifier: "goals_scored".to_string(),
            value: 1,
            points: points - 2,
        });
    }
    LiveElement {
        id,
        stats: LiveStats { minutes: 90, total_points: points, ..Default::default() },
        explain: vec![Explain { fixture: 1, stats }],
    }
}

pub fn live_event(points: impl Fn(i32) -> i32) -> LiveEvent {
    LiveEvent {
        elements: (1..=15).map(|id| live_element(id, points(id))).collect(),
    }
}

pub fn started_fixture() -> Fixture {
    Fixture {
        id: 1,
        event: Some(GAMEWEEK),
        started: Some(true),
        team_h: 1,
        team_a: 2,
        ..Default::default()
    }
}

/// A league of two managers with live data for the current gameweek
pub fn stub_league() -> StubFpl {
    let mut fpl = StubFpl {
        bootstrap: bootstrap(),
        ..Default::default()
    };
    fpl.leagues.insert(
        LEAGUE_ID,
        league(vec![standing(10, "Ann", 300), standing(20, "Bo", 310)]),
    );
    fpl.picks.insert((10, GAMEWEEK), picks(9, 0, 300));
    fpl.picks.insert((20, GAMEWEEK), picks(2, 0, 310));
    fpl.live.insert(GAMEWEEK, live_event(|id| if id == 9 { 10 } else { 2 }));
    fpl.fixtures.insert(GAMEWEEK, vec![started_fixture()]);
    fpl
}

pub fn app_state(fpl: StubFpl, store: Arc<MemoryEventStore>) -> AppState {
    AppState {
        fpl: Arc::new(fpl),
        events: store,
        settings: DashboardSettings::default(),
    }
}

pub fn transfer(entry: i32, event: i32, element_in: i32, element_out: i32) -> TransferEvent {
    TransferEvent {
        element_in,
        element_in_cost: 0,
        element_out,
        element_out_cost: 45,
        entry,
        event,
        time: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Router helpers
// ---------------------------------------------------------------------------

pub async fn call(fpl: StubFpl, request: Request<Body>) -> (StatusCode, Value) {
    let app = router(app_state(fpl, Arc::new(MemoryEventStore::default())));
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
