//! Reconciles freshly polled live statistics against the persisted event log.
//!
//! Phases run delete, insert, update. There is no transaction across phases:
//! a failure aborts the phase it happened in and earlier phases stay applied.
//! Every phase is safe to re-run, so the next poll converges.

use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::error::{FetchError, StoreError};
use crate::models::events::{
    EventKey, EventRecord, PlayerFixtureStat, ReconcileReport, MINUTES_IDENTIFIER,
};
use crate::services::event_store::EventStore;
use crate::services::fpl_api::FplApi;
use crate::services::stats::flatten_live_event;

const FULL_MATCH_MINUTES: i32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePhase {
    Load,
    Delete,
    Insert,
    Update,
}

impl fmt::Display for ReconcilePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReconcilePhase::Load => "load",
            ReconcilePhase::Delete => "delete",
            ReconcilePhase::Insert => "insert",
            ReconcilePhase::Update => "update",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("event reconciliation failed in {phase} phase: {source}")]
pub struct ReconcileError {
    pub phase: ReconcilePhase,
    pub source: StoreError,
}

impl ReconcileError {
    fn in_phase(phase: ReconcilePhase) -> impl FnOnce(StoreError) -> Self {
        move |source| ReconcileError { phase, source }
    }
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Disjoint change sets produced by [`diff`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDiff {
    pub to_insert: Vec<PlayerFixtureStat>,
    pub to_update: Vec<PlayerFixtureStat>,
    pub to_delete: Vec<EventKey>,
    pub unchanged: usize,
}

impl EventDiff {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

/// A stored event needs rewriting when its value or points moved.
/// Minutes creeping up mid-match are skipped until either the points change
/// or the player reaches a full 90 in the fixture that moved them.
fn needs_update(stored: &EventRecord, fresh: &PlayerFixtureStat) -> bool {
    if stored.value == fresh.value && stored.points == fresh.points {
        return false;
    }

    let minutes_jitter = fresh.identifier == MINUTES_IDENTIFIER
        && stored.points == fresh.points
        && fresh.fixture_value != FULL_MATCH_MINUTES;

    !minutes_jitter
}

pub fn diff(fresh: &[PlayerFixtureStat], stored: &[EventRecord]) -> EventDiff {
    let stored_by_key: HashMap<EventKey, &EventRecord> =
        stored.iter().map(|record| (record.key(), record)).collect();
    let fresh_keys: HashSet<EventKey> = fresh.iter().map(PlayerFixtureStat::key).collect();

    let mut result = EventDiff::default();

    for stat in fresh {
        match stored_by_key.get(&stat.key()) {
            None => result.to_insert.push(stat.clone()),
            Some(record) if needs_update(record, stat) => result.to_update.push(stat.clone()),
            Some(_) => result.unchanged += 1,
        }
    }

    result.to_delete = stored
        .iter()
        .map(EventRecord::key)
        .filter(|key| !fresh_keys.contains(key))
        .collect();
    result.to_delete.sort();

    result
}

/// Apply a diff in delete, insert, update order
pub async fn apply(
    store: &dyn EventStore,
    gameweek: i32,
    changes: &EventDiff,
) -> Result<ReconcileReport, ReconcileError> {
    let mut report = ReconcileReport {
        gameweek,
        unchanged: changes.unchanged,
        ..Default::default()
    };

    if !changes.to_delete.is_empty() {
        report.deleted = store
            .delete_events(&changes.to_delete)
            .await
            .map_err(ReconcileError::in_phase(ReconcilePhase::Delete))?;
    }

    if !changes.to_insert.is_empty() {
        report.inserted = store
            .insert_events(&changes.to_insert)
            .await
            .map_err(ReconcileError::in_phase(ReconcilePhase::Insert))?;
    }

    for stat in &changes.to_update {
        report.updated += store
            .update_event(stat)
            .await
            .map_err(ReconcileError::in_phase(ReconcilePhase::Update))?;
    }

    Ok(report)
}

/// Diff `fresh` against what is stored for `gameweek` and persist the changes
pub async fn reconcile(
    store: &dyn EventStore,
    gameweek: i32,
    fresh: &[PlayerFixtureStat],
) -> Result<ReconcileReport, ReconcileError> {
    let stored = store
        .events_for_gameweek(gameweek)
        .await
        .map_err(ReconcileError::in_phase(ReconcilePhase::Load))?;

    let changes = diff(fresh, &stored);
    if changes.is_empty() {
        debug!(gameweek = gameweek, unchanged = changes.unchanged, "No event changes");
        return Ok(ReconcileReport {
            gameweek,
            unchanged: changes.unchanged,
            ..Default::default()
        });
    }
    debug!(
        gameweek = gameweek,
        to_insert = changes.to_insert.len(),
        to_update = changes.to_update.len(),
        to_delete = changes.to_delete.len(),
        "Computed event diff"
    );

    let report = apply(store, gameweek, &changes).await?;
    info!(
        gameweek = gameweek,
        inserted = report.inserted,
        updated = report.updated,
        deleted = report.deleted,
        unchanged = report.unchanged,
        "Reconciled gameweek events"
    );

    Ok(report)
}

/// Poll the live feed for `gameweek` and reconcile it into the store
pub async fn refresh_gameweek(
    fpl: &dyn FplApi,
    store: &dyn EventStore,
    gameweek: i32,
) -> Result<ReconcileReport, RefreshError> {
    let live = fpl.live_event(gameweek).await?;
    let fresh = flatten_live_event(gameweek, &live);
    Ok(reconcile(store, gameweek, &fresh).await?)
}
