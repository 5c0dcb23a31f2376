//! `SeaORM` Entity for leagues table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "leagues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// football-data competition id
    #[sea_orm(unique)]
    pub fd_id: i64,
    /// Competition code, e.g. "PL"
    pub code: String,
    pub name: String,
    pub country: Option<String>,
    pub current_season: Option<i64>,
    pub emblem: Option<String>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
