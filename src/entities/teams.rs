//! `SeaORM` Entity for teams table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub fd_id: i64,
    pub name: String,
    pub short_name: Option<String>,
    /// Three letter abbreviation
    pub tla: Option<String>,
    pub crest: Option<String>,
    pub venue: Option<String>,
    pub founded: Option<i32>,
    pub club_colors: Option<String>,
    pub website: Option<String>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
