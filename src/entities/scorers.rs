//! `SeaORM` Entity for scorers table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "scorers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub league_code: String,
    pub season: Option<i64>,
    pub player_id: i64,
    pub player_name: String,
    pub team_id: Option<i64>,
    pub team_name: String,
    /// Rank in the upstream scorer list (1-based)
    pub position: i32,
    pub goals: i32,
    pub assists: i32,
    pub penalties: i32,
    pub played_matches: i32,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
