// src/lib.rs

use std::sync::Arc;

use config::DashboardSettings;
use services::{event_store::EventStore, fpl_api::FplApi};

#[derive(Clone)]
pub struct AppState {
    pub fpl: Arc<dyn FplApi>,
    pub events: Arc<dyn EventStore>,
    pub settings: DashboardSettings,
}

pub mod entities {
    pub mod prelude;
    pub mod events;
}

pub mod services {
    pub mod fpl_api;
    pub mod players;
    pub mod stats;
    pub mod bonus;
    pub mod live_score;
    pub mod event_store;
    pub mod reconciliation;
    pub mod chips;
    pub mod transfers;
    pub mod league;
    pub mod views;
}

pub mod config;
pub mod error;
pub mod models;
pub mod handlers;
