use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TeamCoaches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamCoaches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TeamCoaches::TeamId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TeamCoaches::CoachId).big_integer().null())
                    .col(ColumnDef::new(TeamCoaches::CoachName).string().null())
                    .col(ColumnDef::new(TeamCoaches::FirstName).string().null())
                    .col(ColumnDef::new(TeamCoaches::LastName).string().null())
                    .col(ColumnDef::new(TeamCoaches::DateOfBirth).date().null())
                    .col(ColumnDef::new(TeamCoaches::Nationality).string().null())
                    .col(ColumnDef::new(TeamCoaches::ContractUntil).string_len(16).null())
                    .col(ColumnDef::new(TeamCoaches::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamSquads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamSquads::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamSquads::TeamId).big_integer().not_null())
                    .col(ColumnDef::new(TeamSquads::PlayerId).big_integer().not_null())
                    .col(ColumnDef::new(TeamSquads::PlayerName).string().not_null())
                    .col(ColumnDef::new(TeamSquads::Position).string().null())
                    .col(ColumnDef::new(TeamSquads::ShirtNumber).integer().null())
                    .col(ColumnDef::new(TeamSquads::Nationality).string().null())
                    .col(ColumnDef::new(TeamSquads::DateOfBirth).date().null())
                    .col(ColumnDef::new(TeamSquads::ContractUntil).string_len(16).null())
                    .col(ColumnDef::new(TeamSquads::Season).integer().null())
                    .col(ColumnDef::new(TeamSquads::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_team_squads_key")
                    .table(TeamSquads::Table)
                    .col(TeamSquads::TeamId)
                    .col(TeamSquads::PlayerId)
                    .col(TeamSquads::Season)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeamSquads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamCoaches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TeamCoaches {
    Table,
    Id,
    TeamId,
    CoachId,
    CoachName,
    FirstName,
    LastName,
    DateOfBirth,
    Nationality,
    ContractUntil,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeamSquads {
    Table,
    Id,
    TeamId,
    PlayerId,
    PlayerName,
    Position,
    ShirtNumber,
    Nationality,
    DateOfBirth,
    ContractUntil,
    Season,
    UpdatedAt,
}
