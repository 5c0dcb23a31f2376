use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SportteryMatches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SportteryMatches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SportteryMatches::MatchCode).string_len(32).not_null())
                    .col(ColumnDef::new(SportteryMatches::GroupDate).date().not_null())
                    .col(ColumnDef::new(SportteryMatches::HomeTeam).string().not_null())
                    .col(ColumnDef::new(SportteryMatches::AwayTeam).string().not_null())
                    .col(ColumnDef::new(SportteryMatches::League).string().not_null())
                    .col(ColumnDef::new(SportteryMatches::MatchTime).timestamp().null())
                    .col(
                        ColumnDef::new(SportteryMatches::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(SportteryMatches::ActualScore).string_len(16).null())
                    .col(ColumnDef::new(SportteryMatches::HalfScore).string_len(16).null())
                    .col(ColumnDef::new(SportteryMatches::ScrapedAt).timestamp().not_null())
                    .col(ColumnDef::new(SportteryMatches::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sporttery_matches_key")
                    .table(SportteryMatches::Table)
                    .col(SportteryMatches::MatchCode)
                    .col(SportteryMatches::GroupDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sporttery_matches_status")
                    .table(SportteryMatches::Table)
                    .col(SportteryMatches::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SportteryMatches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SportteryMatches {
    Table,
    Id,
    MatchCode,
    GroupDate,
    HomeTeam,
    AwayTeam,
    League,
    MatchTime,
    Status,
    ActualScore,
    HalfScore,
    ScrapedAt,
    UpdatedAt,
}
