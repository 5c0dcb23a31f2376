use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Matches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Matches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Matches::FdId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Matches::LeagueCode).string_len(16).not_null())
                    .col(ColumnDef::new(Matches::HomeTeamId).big_integer().null())
                    .col(ColumnDef::new(Matches::AwayTeamId).big_integer().null())
                    .col(ColumnDef::new(Matches::HomeTeamName).string().null())
                    .col(ColumnDef::new(Matches::AwayTeamName).string().null())
                    .col(ColumnDef::new(Matches::MatchDate).timestamp().not_null())
                    .col(ColumnDef::new(Matches::Status).string_len(32).not_null())
                    .col(ColumnDef::new(Matches::HomeScore).integer().null())
                    .col(ColumnDef::new(Matches::AwayScore).integer().null())
                    .col(ColumnDef::new(Matches::HomeHalfScore).integer().null())
                    .col(ColumnDef::new(Matches::AwayHalfScore).integer().null())
                    .col(ColumnDef::new(Matches::Referee).string().null())
                    .col(ColumnDef::new(Matches::Attendance).integer().null())
                    .col(ColumnDef::new(Matches::Matchday).integer().null())
                    .col(ColumnDef::new(Matches::Season).big_integer().null())
                    .col(ColumnDef::new(Matches::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_matches_date")
                    .table(Matches::Table)
                    .col(Matches::MatchDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_matches_status")
                    .table(Matches::Table)
                    .col(Matches::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_matches_league")
                    .table(Matches::Table)
                    .col(Matches::LeagueCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MatchDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MatchDetails::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MatchDetails::MatchId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(MatchDetails::HomeFormation).string_len(16).null())
                    .col(ColumnDef::new(MatchDetails::AwayFormation).string_len(16).null())
                    .col(ColumnDef::new(MatchDetails::HomeCoachName).string().null())
                    .col(ColumnDef::new(MatchDetails::AwayCoachName).string().null())
                    .col(ColumnDef::new(MatchDetails::HomeGoalCount).integer().not_null().default(0))
                    .col(ColumnDef::new(MatchDetails::AwayGoalCount).integer().not_null().default(0))
                    .col(ColumnDef::new(MatchDetails::HomeYellowCards).integer().not_null().default(0))
                    .col(ColumnDef::new(MatchDetails::AwayYellowCards).integer().not_null().default(0))
                    .col(ColumnDef::new(MatchDetails::HomeRedCards).integer().not_null().default(0))
                    .col(ColumnDef::new(MatchDetails::AwayRedCards).integer().not_null().default(0))
                    .col(ColumnDef::new(MatchDetails::DetailsJson).text().null())
                    .col(ColumnDef::new(MatchDetails::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Goals are a replace-on-sync child set of match_details, no natural key of their own
        manager
            .create_table(
                Table::create()
                    .table(MatchGoals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MatchGoals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MatchGoals::MatchId).big_integer().not_null())
                    .col(ColumnDef::new(MatchGoals::TeamId).big_integer().null())
                    .col(ColumnDef::new(MatchGoals::TeamName).string().null())
                    .col(ColumnDef::new(MatchGoals::PlayerId).big_integer().null())
                    .col(ColumnDef::new(MatchGoals::PlayerName).string().null())
                    .col(ColumnDef::new(MatchGoals::Minute).integer().null())
                    .col(ColumnDef::new(MatchGoals::MinuteExtra).integer().null())
                    .col(ColumnDef::new(MatchGoals::GoalType).string_len(32).not_null())
                    .col(ColumnDef::new(MatchGoals::HomeAway).string_len(8).not_null())
                    .col(ColumnDef::new(MatchGoals::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_match_goals_match")
                    .table(MatchGoals::Table)
                    .col(MatchGoals::MatchId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MatchGoals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MatchDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Matches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Matches {
    Table,
    Id,
    FdId,
    LeagueCode,
    HomeTeamId,
    AwayTeamId,
    HomeTeamName,
    AwayTeamName,
    MatchDate,
    Status,
    HomeScore,
    AwayScore,
    HomeHalfScore,
    AwayHalfScore,
    Referee,
    Attendance,
    Matchday,
    Season,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MatchDetails {
    Table,
    Id,
    MatchId,
    HomeFormation,
    AwayFormation,
    HomeCoachName,
    AwayCoachName,
    HomeGoalCount,
    AwayGoalCount,
    HomeYellowCards,
    AwayYellowCards,
    HomeRedCards,
    AwayRedCards,
    DetailsJson,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MatchGoals {
    Table,
    Id,
    MatchId,
    TeamId,
    TeamName,
    PlayerId,
    PlayerName,
    Minute,
    MinuteExtra,
    GoalType,
    HomeAway,
    UpdatedAt,
}
