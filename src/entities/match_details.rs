//! `SeaORM` Entity for match_details table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "match_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// football-data match id
    #[sea_orm(unique)]
    pub match_id: i64,
    pub home_formation: Option<String>,
    pub away_formation: Option<String>,
    pub home_coach_name: Option<String>,
    pub away_coach_name: Option<String>,
    pub home_goal_count: i32,
    pub away_goal_count: i32,
    pub home_yellow_cards: i32,
    pub away_yellow_cards: i32,
    pub home_red_cards: i32,
    pub away_red_cards: i32,
    /// Raw upstream payload, kept for lineups and benches
    #[sea_orm(column_type = "Text", nullable)]
    pub details_json: Option<String>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
