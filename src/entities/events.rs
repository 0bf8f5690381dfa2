//! `SeaORM` Entity for events table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::events::EventRecord;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub gw: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub player_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub identifier: String,
    pub value: i32,
    pub points: i32,
    pub fixture: i32,
    pub minutes: i32,
    pub total_points: i32,
    pub event_date: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for EventRecord {
    fn from(model: Model) -> Self {
        EventRecord {
            gameweek: model.gw,
            player_id: model.player_id,
            identifier: model.identifier,
            value: model.value,
            points: model.points,
            fixture_id: model.fixture,
            minutes_at_capture: model.minutes,
            total_points_at_capture: model.total_points,
            event_date: model.event_date,
            updated_at: model.updated_at,
        }
    }
}
