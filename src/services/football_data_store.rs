//! Persistence gateway for football-data records.
//!
//! `save_*` methods never fail outward: database errors are logged and reported as `false`
//! so a routine can keep going and report a lower record count.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities::prelude::*;
use crate::entities::{
    leagues, match_details, match_goals, matches, scorers, standings, team_coaches, team_squads,
    teams,
};
use crate::models::football_data::{
    CoachRecord, LeagueRecord, MatchDetailsRecord, MatchGoalRecord, MatchRecord, ScorerRecord,
    SquadPlayerRecord, StandingRecord, TeamRecord,
};

/// Upper bound on scorer list reads
pub const MAX_SCORERS: u64 = 50;

/// Status groups accepted by [`MatchFilter::status`]
pub const LIVE_STATUSES: [&str; 3] = ["LIVE", "IN_PLAY", "PAUSED"];
pub const UPCOMING_STATUSES: [&str; 2] = ["SCHEDULED", "TIMED"];

#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    /// Kickoff date (UTC)
    pub date: Option<NaiveDate>,
    pub league: Option<String>,
    /// A single status, or the `LIVE` / `SCHEDULED` groups
    pub status: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerOrder {
    Goals,
    Assists,
}

#[derive(Debug, Clone)]
pub struct MatchDetailsView {
    pub details: match_details::Model,
    pub goals: Vec<match_goals::Model>,
}

fn status_group(status: &str) -> Vec<String> {
    match status {
        "LIVE" => LIVE_STATUSES.iter().map(|s| s.to_string()).collect(),
        "SCHEDULED" => UPCOMING_STATUSES.iter().map(|s| s.to_string()).collect(),
        other => vec![other.to_string()],
    }
}

#[derive(Clone)]
pub struct FootballDataStore {
    db: DatabaseConnection,
}

impl FootballDataStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn report(entity: &str, key: impl std::fmt::Display, result: Result<(), DbErr>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save {} {}: {}", entity, key, e);
                false
            }
        }
    }

    pub async fn save_match(&self, record: &MatchRecord) -> bool {
        Self::report("match", record.fd_id, self.upsert_match(record).await)
    }

    async fn upsert_match(&self, r: &MatchRecord) -> Result<(), DbErr> {
        let model = matches::ActiveModel {
            fd_id: Set(r.fd_id),
            league_code: Set(r.league_code.clone()),
            home_team_id: Set(r.home_team_id),
            away_team_id: Set(r.away_team_id),
            home_team_name: Set(r.home_team_name.clone()),
            away_team_name: Set(r.away_team_name.clone()),
            match_date: Set(r.match_date),
            status: Set(r.status.clone()),
            home_score: Set(r.home_score),
            away_score: Set(r.away_score),
            home_half_score: Set(r.home_half_score),
            away_half_score: Set(r.away_half_score),
            referee: Set(r.referee.clone()),
            attendance: Set(r.attendance),
            matchday: Set(r.matchday),
            season: Set(r.season),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        Matches::insert(model)
            .on_conflict(
                OnConflict::column(matches::Column::FdId)
                    .update_columns([
                        matches::Column::LeagueCode,
                        matches::Column::HomeTeamId,
                        matches::Column::AwayTeamId,
                        matches::Column::HomeTeamName,
                        matches::Column::AwayTeamName,
                        matches::Column::MatchDate,
                        matches::Column::Status,
                        matches::Column::HomeScore,
                        matches::Column::AwayScore,
                        matches::Column::HomeHalfScore,
                        matches::Column::AwayHalfScore,
                        matches::Column::Referee,
                        matches::Column::Attendance,
                        matches::Column::Matchday,
                        matches::Column::Season,
                        matches::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    pub async fn save_league(&self, record: &LeagueRecord) -> bool {
        Self::report("league", &record.code, self.upsert_league(record).await)
    }

    async fn upsert_league(&self, r: &LeagueRecord) -> Result<(), DbErr> {
        let model = leagues::ActiveModel {
            fd_id: Set(r.fd_id),
            code: Set(r.code.clone()),
            name: Set(r.name.clone()),
            country: Set(r.country.clone()),
            current_season: Set(r.current_season),
            emblem: Set(r.emblem.clone()),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        Leagues::insert(model)
            .on_conflict(
                OnConflict::column(leagues::Column::FdId)
                    .update_columns([
                        leagues::Column::Code,
                        leagues::Column::Name,
                        leagues::Column::Country,
                        leagues::Column::CurrentSeason,
                        leagues::Column::Emblem,
                        leagues::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    pub async fn save_team(&self, record: &TeamRecord) -> bool {
        Self::report("team", record.fd_id, self.upsert_team(record).await)
    }

    async fn upsert_team(&self, r: &TeamRecord) -> Result<(), DbErr> {
        let model = teams::ActiveModel {
            fd_id: Set(r.fd_id),
            name: Set(r.name.clone()),
            short_name: Set(r.short_name.clone()),
            tla: Set(r.tla.clone()),
            crest: Set(r.crest.clone()),
            venue: Set(r.venue.clone()),
            founded: Set(r.founded),
            club_colors: Set(r.club_colors.clone()),
            website: Set(r.website.clone()),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        Teams::insert(model)
            .on_conflict(
                OnConflict::column(teams::Column::FdId)
                    .update_columns([
                        teams::Column::Name,
                        teams::Column::ShortName,
                        teams::Column::Tla,
                        teams::Column::Crest,
                        teams::Column::Venue,
                        teams::Column::Founded,
                        teams::Column::ClubColors,
                        teams::Column::Website,
                        teams::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    pub async fn save_standing(&self, record: &StandingRecord) -> bool {
        let key = format!("{}/{}", record.league_code, record.team_id);
        Self::report("standing", key, self.replace_standing(record).await)
    }

    /// Delete-then-insert so the newest write always has the highest id.
    async fn replace_standing(&self, r: &StandingRecord) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        let existing = Standings::delete_many()
            .filter(standings::Column::LeagueCode.eq(&r.league_code))
            .filter(standings::Column::TeamId.eq(r.team_id));
        let existing = match r.season {
            Some(season) => existing.filter(standings::Column::Season.eq(season)),
            None => existing.filter(standings::Column::Season.is_null()),
        };
        existing.exec(&txn).await?;

        standings::ActiveModel {
            league_code: Set(r.league_code.clone()),
            team_id: Set(r.team_id),
            team_name: Set(r.team_name.clone()),
            season: Set(r.season),
            position: Set(r.position),
            played_games: Set(r.played_games),
            won: Set(r.won),
            draw: Set(r.draw),
            lost: Set(r.lost),
            points: Set(r.points),
            goals_for: Set(r.goals_for),
            goals_against: Set(r.goals_against),
            goal_diff: Set(r.goal_diff),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await
    }

    pub async fn save_scorer(&self, record: &ScorerRecord) -> bool {
        let key = format!("{}/{}", record.league_code, record.player_id);
        Self::report("scorer", key, self.replace_scorer(record).await)
    }

    async fn replace_scorer(&self, r: &ScorerRecord) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        let existing = Scorers::delete_many()
            .filter(scorers::Column::LeagueCode.eq(&r.league_code))
            .filter(scorers::Column::PlayerId.eq(r.player_id));
        let existing = match r.season {
            Some(season) => existing.filter(scorers::Column::Season.eq(season)),
            None => existing.filter(scorers::Column::Season.is_null()),
        };
        existing.exec(&txn).await?;

        scorers::ActiveModel {
            league_code: Set(r.league_code.clone()),
            season: Set(r.season),
            player_id: Set(r.player_id),
            player_name: Set(r.player_name.clone()),
            team_id: Set(r.team_id),
            team_name: Set(r.team_name.clone()),
            position: Set(r.position),
            goals: Set(r.goals),
            assists: Set(r.assists),
            penalties: Set(r.penalties),
            played_matches: Set(r.played_matches),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await
    }

    pub async fn save_team_squad(&self, record: &SquadPlayerRecord) -> bool {
        let key = format!("{}/{}", record.team_id, record.player_id);
        Self::report("squad player", key, self.replace_squad_player(record).await)
    }

    async fn replace_squad_player(&self, r: &SquadPlayerRecord) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        let existing = TeamSquads::delete_many()
            .filter(team_squads::Column::TeamId.eq(r.team_id))
            .filter(team_squads::Column::PlayerId.eq(r.player_id));
        let existing = match r.season {
            Some(season) => existing.filter(team_squads::Column::Season.eq(season)),
            None => existing.filter(team_squads::Column::Season.is_null()),
        };
        existing.exec(&txn).await?;

        team_squads::ActiveModel {
            team_id: Set(r.team_id),
            player_id: Set(r.player_id),
            player_name: Set(r.player_name.clone()),
            position: Set(r.position.clone()),
            shirt_number: Set(r.shirt_number),
            nationality: Set(r.nationality.clone()),
            date_of_birth: Set(r.date_of_birth),
            contract_until: Set(r.contract_until.clone()),
            season: Set(r.season),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await
    }

    pub async fn save_team_coach(&self, record: &CoachRecord) -> bool {
        Self::report("coach of team", record.team_id, self.upsert_team_coach(record).await)
    }

    async fn upsert_team_coach(&self, r: &CoachRecord) -> Result<(), DbErr> {
        let model = team_coaches::ActiveModel {
            team_id: Set(r.team_id),
            coach_id: Set(r.coach_id),
            coach_name: Set(r.coach_name.clone()),
            first_name: Set(r.first_name.clone()),
            last_name: Set(r.last_name.clone()),
            date_of_birth: Set(r.date_of_birth),
            nationality: Set(r.nationality.clone()),
            contract_until: Set(r.contract_until.clone()),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        TeamCoaches::insert(model)
            .on_conflict(
                OnConflict::column(team_coaches::Column::TeamId)
                    .update_columns([
                        team_coaches::Column::CoachId,
                        team_coaches::Column::CoachName,
                        team_coaches::Column::FirstName,
                        team_coaches::Column::LastName,
                        team_coaches::Column::DateOfBirth,
                        team_coaches::Column::Nationality,
                        team_coaches::Column::ContractUntil,
                        team_coaches::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    pub async fn save_match_details(&self, record: &MatchDetailsRecord) -> bool {
        Self::report(
            "match details",
            record.match_id,
            self.upsert_match_details(record).await,
        )
    }

    async fn upsert_match_details(&self, r: &MatchDetailsRecord) -> Result<(), DbErr> {
        let model = match_details::ActiveModel {
            match_id: Set(r.match_id),
            home_formation: Set(r.home_formation.clone()),
            away_formation: Set(r.away_formation.clone()),
            home_coach_name: Set(r.home_coach_name.clone()),
            away_coach_name: Set(r.away_coach_name.clone()),
            home_goal_count: Set(r.home_goal_count),
            away_goal_count: Set(r.away_goal_count),
            home_yellow_cards: Set(r.home_yellow_cards),
            away_yellow_cards: Set(r.away_yellow_cards),
            home_red_cards: Set(r.home_red_cards),
            away_red_cards: Set(r.away_red_cards),
            details_json: Set(r.details_json.clone()),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        MatchDetails::insert(model)
            .on_conflict(
                OnConflict::column(match_details::Column::MatchId)
                    .update_columns([
                        match_details::Column::HomeFormation,
                        match_details::Column::AwayFormation,
                        match_details::Column::HomeCoachName,
                        match_details::Column::AwayCoachName,
                        match_details::Column::HomeGoalCount,
                        match_details::Column::AwayGoalCount,
                        match_details::Column::HomeYellowCards,
                        match_details::Column::AwayYellowCards,
                        match_details::Column::HomeRedCards,
                        match_details::Column::AwayRedCards,
                        match_details::Column::DetailsJson,
                        match_details::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    /// Swap the goal list of a match for `goals` in one transaction.
    pub async fn replace_match_goals(&self, match_id: i64, goals: &[MatchGoalRecord]) -> bool {
        Self::report("goals of match", match_id, self.replace_goals(match_id, goals).await)
    }

    async fn replace_goals(&self, match_id: i64, goals: &[MatchGoalRecord]) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        MatchGoals::delete_many()
            .filter(match_goals::Column::MatchId.eq(match_id))
            .exec(&txn)
            .await?;

        if !goals.is_empty() {
            let now = Utc::now().naive_utc();
            let rows = goals.iter().map(|g| match_goals::ActiveModel {
                match_id: Set(match_id),
                team_id: Set(g.team_id),
                team_name: Set(g.team_name.clone()),
                player_id: Set(g.player_id),
                player_name: Set(g.player_name.clone()),
                minute: Set(g.minute),
                minute_extra: Set(g.minute_extra),
                goal_type: Set(g.goal_type.clone()),
                home_away: Set(g.home_away.clone()),
                updated_at: Set(now),
                ..Default::default()
            });
            MatchGoals::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await
    }

    pub async fn get_matches(&self, filter: &MatchFilter) -> Result<Vec<matches::Model>, DbErr> {
        let mut query = Matches::find();

        if let Some(date) = filter.date {
            let start = date.and_hms_opt(0, 0, 0).unwrap_or_default();
            let end = start + chrono::Duration::days(1);
            query = query
                .filter(matches::Column::MatchDate.gte(start))
                .filter(matches::Column::MatchDate.lt(end));
        }
        if let Some(league) = &filter.league {
            query = query.filter(matches::Column::LeagueCode.eq(league));
        }
        if let Some(status) = &filter.status {
            query = query.filter(matches::Column::Status.is_in(status_group(status)));
        }

        query = query.order_by_asc(matches::Column::MatchDate);
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        query.all(&self.db).await
    }

    pub async fn get_match(&self, fd_id: i64) -> Result<Option<matches::Model>, DbErr> {
        Matches::find()
            .filter(matches::Column::FdId.eq(fd_id))
            .one(&self.db)
            .await
    }

    pub async fn get_match_details(&self, match_id: i64) -> Result<Option<MatchDetailsView>, DbErr> {
        let details = MatchDetails::find()
            .filter(match_details::Column::MatchId.eq(match_id))
            .one(&self.db)
            .await?;

        let Some(details) = details else {
            return Ok(None);
        };

        let goals = MatchGoals::find()
            .filter(match_goals::Column::MatchId.eq(match_id))
            .order_by_asc(match_goals::Column::Minute)
            .order_by_asc(match_goals::Column::MinuteExtra)
            .order_by_asc(match_goals::Column::Id)
            .all(&self.db)
            .await?;

        Ok(Some(MatchDetailsView { details, goals }))
    }

    /// One row per team, the most recently written one.
    pub async fn get_standings(
        &self,
        league: &str,
        season: Option<i64>,
    ) -> Result<Vec<standings::Model>, DbErr> {
        let mut latest = Query::select()
            .expr(Expr::col(standings::Column::Id).max())
            .from(Standings)
            .and_where(standings::Column::LeagueCode.eq(league))
            .group_by_col(standings::Column::TeamId)
            .to_owned();
        if let Some(season) = season {
            latest.and_where(standings::Column::Season.eq(season));
        }

        Standings::find()
            .filter(standings::Column::Id.in_subquery(latest))
            .order_by_asc(standings::Column::Position)
            .all(&self.db)
            .await
    }

    /// One row per player, the most recently written one, capped at [`MAX_SCORERS`].
    pub async fn get_scorers(
        &self,
        league: &str,
        season: Option<i64>,
        order: ScorerOrder,
    ) -> Result<Vec<scorers::Model>, DbErr> {
        let mut latest = Query::select()
            .expr(Expr::col(scorers::Column::Id).max())
            .from(Scorers)
            .and_where(scorers::Column::LeagueCode.eq(league))
            .group_by_col(scorers::Column::PlayerId)
            .to_owned();
        if let Some(season) = season {
            latest.and_where(scorers::Column::Season.eq(season));
        }

        let query = Scorers::find().filter(scorers::Column::Id.in_subquery(latest));
        let query = match order {
            ScorerOrder::Goals => query
                .order_by_desc(scorers::Column::Goals)
                .order_by_desc(scorers::Column::Assists),
            ScorerOrder::Assists => query
                .order_by_desc(scorers::Column::Assists)
                .order_by_desc(scorers::Column::Goals),
        };

        query
            .order_by_asc(scorers::Column::PlayerName)
            .limit(MAX_SCORERS)
            .all(&self.db)
            .await
    }

    /// One row per player of the team, the most recently written one.
    pub async fn get_squad(
        &self,
        team_id: i64,
        season: Option<i32>,
    ) -> Result<Vec<team_squads::Model>, DbErr> {
        let mut latest = Query::select()
            .expr(Expr::col(team_squads::Column::Id).max())
            .from(TeamSquads)
            .and_where(team_squads::Column::TeamId.eq(team_id))
            .group_by_col(team_squads::Column::PlayerId)
            .to_owned();
        if let Some(season) = season {
            latest.and_where(team_squads::Column::Season.eq(season));
        }

        TeamSquads::find()
            .filter(team_squads::Column::Id.in_subquery(latest))
            .order_by_asc(team_squads::Column::ShirtNumber)
            .order_by_asc(team_squads::Column::PlayerName)
            .all(&self.db)
            .await
    }

    pub async fn get_team_coach(&self, team_id: i64) -> Result<Option<team_coaches::Model>, DbErr> {
        TeamCoaches::find()
            .filter(team_coaches::Column::TeamId.eq(team_id))
            .one(&self.db)
            .await
    }

    pub async fn get_all_team_ids(&self) -> Result<Vec<i64>, DbErr> {
        Teams::find()
            .select_only()
            .column(teams::Column::FdId)
            .order_by_asc(teams::Column::FdId)
            .into_tuple()
            .all(&self.db)
            .await
    }

    /// Match ids with one of `statuses`, most recent kickoff first.
    pub async fn get_match_ids_by_status(
        &self,
        statuses: &[&str],
        limit: Option<u64>,
    ) -> Result<Vec<i64>, DbErr> {
        let mut query = Matches::find()
            .select_only()
            .column(matches::Column::FdId)
            .filter(matches::Column::Status.is_in(statuses.iter().copied()))
            .order_by_desc(matches::Column::MatchDate);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query.into_tuple().all(&self.db).await
    }

    pub async fn count_matches(&self) -> Result<u64, DbErr> {
        Matches::find().count(&self.db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_groups() {
        assert_eq!(status_group("LIVE"), vec!["LIVE", "IN_PLAY", "PAUSED"]);
        assert_eq!(status_group("SCHEDULED"), vec!["SCHEDULED", "TIMED"]);
        assert_eq!(status_group("FINISHED"), vec!["FINISHED"]);
    }
}
