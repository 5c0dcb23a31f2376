use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Standings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Standings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Standings::LeagueCode).string_len(16).not_null())
                    .col(ColumnDef::new(Standings::TeamId).big_integer().not_null())
                    .col(ColumnDef::new(Standings::TeamName).string().not_null())
                    .col(ColumnDef::new(Standings::Season).big_integer().null())
                    .col(ColumnDef::new(Standings::Position).integer().not_null())
                    .col(ColumnDef::new(Standings::PlayedGames).integer().not_null())
                    .col(ColumnDef::new(Standings::Won).integer().not_null())
                    .col(ColumnDef::new(Standings::Draw).integer().not_null())
                    .col(ColumnDef::new(Standings::Lost).integer().not_null())
                    .col(ColumnDef::new(Standings::Points).integer().not_null())
                    .col(ColumnDef::new(Standings::GoalsFor).integer().not_null())
                    .col(ColumnDef::new(Standings::GoalsAgainst).integer().not_null())
                    .col(ColumnDef::new(Standings::GoalDiff).integer().not_null())
                    .col(ColumnDef::new(Standings::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // A null season never collides here, which is why reads dedup by max(id)
        manager
            .create_index(
                Index::create()
                    .name("idx_standings_key")
                    .table(Standings::Table)
                    .col(Standings::LeagueCode)
                    .col(Standings::TeamId)
                    .col(Standings::Season)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Scorers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scorers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scorers::LeagueCode).string_len(16).not_null())
                    .col(ColumnDef::new(Scorers::Season).big_integer().null())
                    .col(ColumnDef::new(Scorers::PlayerId).big_integer().not_null())
                    .col(ColumnDef::new(Scorers::PlayerName).string().not_null())
                    .col(ColumnDef::new(Scorers::TeamId).big_integer().null())
                    .col(ColumnDef::new(Scorers::TeamName).string().not_null())
                    .col(ColumnDef::new(Scorers::Position).integer().not_null())
                    .col(ColumnDef::new(Scorers::Goals).integer().not_null())
                    .col(ColumnDef::new(Scorers::Assists).integer().not_null())
                    .col(ColumnDef::new(Scorers::Penalties).integer().not_null())
                    .col(ColumnDef::new(Scorers::PlayedMatches).integer().not_null())
                    .col(ColumnDef::new(Scorers::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scorers_key")
                    .table(Scorers::Table)
                    .col(Scorers::LeagueCode)
                    .col(Scorers::Season)
                    .col(Scorers::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scorers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Standings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Standings {
    Table,
    Id,
    LeagueCode,
    TeamId,
    TeamName,
    Season,
    Position,
    PlayedGames,
    Won,
    Draw,
    Lost,
    Points,
    GoalsFor,
    GoalsAgainst,
    GoalDiff,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Scorers {
    Table,
    Id,
    LeagueCode,
    Season,
    PlayerId,
    PlayerName,
    TeamId,
    TeamName,
    Position,
    Goals,
    Assists,
    Penalties,
    PlayedMatches,
    UpdatedAt,
}
