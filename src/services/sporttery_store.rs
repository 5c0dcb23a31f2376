use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::prelude::SportteryMatches;
use crate::entities::sporttery_matches;
use crate::models::sporttery::SportteryMatchRecord;

/// Persistence gateway for lottery fixtures, keyed by (match_code, group_date).
#[derive(Clone)]
pub struct SportteryStore {
    db: DatabaseConnection,
}

impl SportteryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn save_match(&self, record: &SportteryMatchRecord) -> bool {
        match self.upsert_match(record).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    "Failed to save sporttery match {} ({}): {}",
                    record.match_code,
                    record.group_date,
                    e
                );
                false
            }
        }
    }

    async fn upsert_match(&self, r: &SportteryMatchRecord) -> Result<(), DbErr> {
        let now = Utc::now().naive_utc();
        let model = sporttery_matches::ActiveModel {
            match_code: Set(r.match_code.clone()),
            group_date: Set(r.group_date),
            home_team: Set(r.home_team.clone()),
            away_team: Set(r.away_team.clone()),
            league: Set(r.league.clone()),
            match_time: Set(r.match_time),
            status: Set(r.status.clone()),
            actual_score: Set(r.actual_score.clone()),
            half_score: Set(r.half_score.clone()),
            scraped_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        SportteryMatches::insert(model)
            .on_conflict(
                OnConflict::columns([
                    sporttery_matches::Column::MatchCode,
                    sporttery_matches::Column::GroupDate,
                ])
                .update_columns([
                    sporttery_matches::Column::HomeTeam,
                    sporttery_matches::Column::AwayTeam,
                    sporttery_matches::Column::League,
                    sporttery_matches::Column::MatchTime,
                    sporttery_matches::Column::Status,
                    sporttery_matches::Column::ActualScore,
                    sporttery_matches::Column::HalfScore,
                    sporttery_matches::Column::ScrapedAt,
                    sporttery_matches::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    /// Fixtures by group date and status, in kickoff order.
    pub async fn get_matches(
        &self,
        date: Option<NaiveDate>,
        status: Option<&str>,
        limit: u64,
    ) -> Result<Vec<sporttery_matches::Model>, DbErr> {
        let mut query = SportteryMatches::find();
        if let Some(date) = date {
            query = query.filter(sporttery_matches::Column::GroupDate.eq(date));
        }
        if let Some(status) = status {
            query = query.filter(sporttery_matches::Column::Status.eq(status));
        }

        query
            .order_by_desc(sporttery_matches::Column::GroupDate)
            .order_by_asc(sporttery_matches::Column::MatchTime)
            .order_by_asc(sporttery_matches::Column::MatchCode)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Latest fixture carrying `match_code`; codes repeat across business dates.
    pub async fn get_match_by_code(
        &self,
        match_code: &str,
    ) -> Result<Option<sporttery_matches::Model>, DbErr> {
        SportteryMatches::find()
            .filter(sporttery_matches::Column::MatchCode.eq(match_code))
            .order_by_desc(sporttery_matches::Column::GroupDate)
            .one(&self.db)
            .await
    }

    pub async fn count_matches(&self) -> Result<u64, DbErr> {
        SportteryMatches::find().count(&self.db).await
    }
}
