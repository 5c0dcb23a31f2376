//! `SeaORM` Entity for team_squads table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "team_squads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub team_id: i64,
    pub player_id: i64,
    pub player_name: String,
    pub position: Option<String>,
    pub shirt_number: Option<i32>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<Date>,
    pub contract_until: Option<String>,
    pub season: Option<i32>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
