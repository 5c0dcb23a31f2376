//! `SeaORM` Entity for sporttery_matches table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sporttery_matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Lottery match number, e.g. "周六001"
    pub match_code: String,
    /// Business date the match is grouped under
    pub group_date: Date,
    pub home_team: String,
    pub away_team: String,
    pub league: String,
    pub match_time: Option<DateTime>,
    /// "pending" or "finished"
    pub status: String,
    pub actual_score: Option<String>,
    pub half_score: Option<String>,
    pub scraped_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
