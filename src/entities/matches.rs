//! `SeaORM` Entity for matches table
//!
//! One row per football-data match, overwritten on every sync.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub fd_id: i64,
    pub league_code: String,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub home_team_name: Option<String>,
    pub away_team_name: Option<String>,
    /// Kickoff time (UTC)
    pub match_date: DateTime,
    /// SCHEDULED, TIMED, IN_PLAY, PAUSED, FINISHED, ...
    pub status: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub home_half_score: Option<i32>,
    pub away_half_score: Option<i32>,
    pub referee: Option<String>,
    pub attendance: Option<i32>,
    pub matchday: Option<i32>,
    pub season: Option<i64>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
