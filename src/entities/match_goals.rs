//! `SeaORM` Entity for match_goals table
//!
//! Replaced wholesale per match on every details sync.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "match_goals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub match_id: i64,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
    pub player_id: Option<i64>,
    pub player_name: Option<String>,
    pub minute: Option<i32>,
    pub minute_extra: Option<i32>,
    /// REGULAR, PENALTY, OWN
    pub goal_type: String,
    /// "home" or "away"
    pub home_away: String,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
