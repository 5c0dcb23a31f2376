// src/lib.rs

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use config::Settings;
use error::SourceError;
use services::{
    football_data::FootballDataService, football_data_store::FootballDataStore,
    rate_limiter::RateLimiter, sporttery::SportteryService, sporttery_store::SportteryStore,
};

/// Everything a sync routine needs.
#[derive(Clone)]
pub struct SyncContext {
    pub db: DatabaseConnection,
    pub football_data: FootballDataService,
    pub sporttery: SportteryService,
    pub fd_store: FootballDataStore,
    pub sporttery_store: SportteryStore,
    pub monitored_leagues: Vec<String>,
}

impl SyncContext {
    /// Build adapters and stores from settings. All football-data jobs share one limiter.
    pub fn from_settings(db: DatabaseConnection, settings: &Settings) -> Result<Self, SourceError> {
        let limiter = Arc::new(RateLimiter::new(
            settings.fd_rate_limit,
            settings.fd_rate_window,
        ));

        Ok(Self {
            football_data: FootballDataService::new(
                settings.fd_api_token.clone(),
                settings.fd_base_url.clone(),
                limiter,
                settings.fd_rate_limit_cooldown,
            )?,
            sporttery: SportteryService::new(
                settings.sporttery_base_url.clone(),
                settings.sporttery_timeout,
            )?,
            fd_store: FootballDataStore::new(db.clone()),
            sporttery_store: SportteryStore::new(db.clone()),
            monitored_leagues: settings.monitored_leagues.clone(),
            db,
        })
    }
}

pub mod config;
pub mod error;

pub mod entities {
    pub mod prelude;
    pub mod leagues;
    pub mod teams;
    pub mod matches;
    pub mod match_details;
    pub mod match_goals;
    pub mod standings;
    pub mod scorers;
    pub mod team_coaches;
    pub mod team_squads;
    pub mod sporttery_matches;
    pub mod sync_logs;
}

pub mod services {
    pub mod rate_limiter;
    pub mod football_data;
    pub mod sporttery;
    pub mod football_data_store;
    pub mod sporttery_store;
    pub mod sync_log;
}

pub mod models;
pub mod jobs;
