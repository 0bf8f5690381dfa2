//! Persisted event log, keyed by (gameweek, player, identifier).

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::entities::{events, prelude::Events};
use crate::error::StoreError;
use crate::models::events::{EventKey, EventRecord, PlayerFixtureStat};

// 10 bound parameters per row keeps a batch well under the Postgres limit
const WRITE_BATCH_SIZE: usize = 1000;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Every persisted event of a gameweek, most recently updated first
    async fn events_for_gameweek(&self, gameweek: i32) -> Result<Vec<EventRecord>, StoreError>;

    /// Insert new events. Keys that already exist are left untouched.
    async fn insert_events(&self, events: &[PlayerFixtureStat]) -> Result<u64, StoreError>;

    /// Overwrite the event stored under `event.key()`
    async fn update_event(&self, event: &PlayerFixtureStat) -> Result<u64, StoreError>;

    /// Delete events by key. Keys with no stored row are ignored.
    async fn delete_events(&self, keys: &[EventKey]) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct SeaOrmEventStore {
    db: DatabaseConnection,
}

impl SeaOrmEventStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn key_condition(key: &EventKey) -> Condition {
    Condition::all()
        .add(events::Column::Gw.eq(key.gameweek))
        .add(events::Column::PlayerId.eq(key.player_id))
        .add(events::Column::Identifier.eq(key.identifier.clone()))
}

#[async_trait]
impl EventStore for SeaOrmEventStore {
    async fn events_for_gameweek(&self, gameweek: i32) -> Result<Vec<EventRecord>, StoreError> {
        let rows = Events::find()
            .filter(events::Column::Gw.eq(gameweek))
            .order_by(events::Column::UpdatedAt, Order::Desc)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(EventRecord::from).collect())
    }

    async fn insert_events(&self, stats: &[PlayerFixtureStat]) -> Result<u64, StoreError> {
        let now = Utc::now().fixed_offset();
        let mut inserted = 0;

        for batch in stats.chunks(WRITE_BATCH_SIZE) {
            let models = batch.iter().map(|stat| events::ActiveModel {
                gw: Set(stat.gameweek),
                player_id: Set(stat.player_id),
                identifier: Set(stat.identifier.clone()),
                value: Set(stat.value),
                points: Set(stat.points),
                fixture: Set(stat.fixture_id),
                minutes: Set(stat.minutes),
                total_points: Set(stat.total_points),
                event_date: Set(now),
                updated_at: Set(now),
            });

            inserted += Events::insert_many(models)
                .on_conflict(
                    OnConflict::columns([
                        events::Column::Gw,
                        events::Column::PlayerId,
                        events::Column::Identifier,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?;
        }

        debug!(rows = inserted, "Inserted events");
        Ok(inserted)
    }

    async fn update_event(&self, stat: &PlayerFixtureStat) -> Result<u64, StoreError> {
        let result = Events::update_many()
            .col_expr(events::Column::Value, Expr::value(stat.value))
            .col_expr(events::Column::Points, Expr::value(stat.points))
            .col_expr(events::Column::Fixture, Expr::value(stat.fixture_id))
            .col_expr(events::Column::Minutes, Expr::value(stat.minutes))
            .col_expr(events::Column::TotalPoints, Expr::value(stat.total_points))
            .col_expr(events::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(key_condition(&stat.key()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_events(&self, keys: &[EventKey]) -> Result<u64, StoreError> {
        let mut deleted = 0;

        for batch in keys.chunks(WRITE_BATCH_SIZE) {
            let condition = batch
                .iter()
                .fold(Condition::any(), |condition, key| condition.add(key_condition(key)));

            deleted += Events::delete_many()
                .filter(condition)
                .exec(&self.db)
                .await?
                .rows_affected;
        }

        debug!(rows = deleted, "Deleted events");
        Ok(deleted)
    }
}
