use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leagues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Leagues::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Leagues::FdId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Leagues::Code).string_len(16).not_null())
                    .col(ColumnDef::new(Leagues::Name).string().not_null())
                    .col(ColumnDef::new(Leagues::Country).string().null())
                    .col(ColumnDef::new(Leagues::CurrentSeason).big_integer().null())
                    .col(ColumnDef::new(Leagues::Emblem).text().null())
                    .col(ColumnDef::new(Leagues::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teams::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Teams::FdId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teams::Name).string().not_null())
                    .col(ColumnDef::new(Teams::ShortName).string().null())
                    .col(ColumnDef::new(Teams::Tla).string_len(8).null())
                    .col(ColumnDef::new(Teams::Crest).text().null())
                    .col(ColumnDef::new(Teams::Venue).string().null())
                    .col(ColumnDef::new(Teams::Founded).integer().null())
                    .col(ColumnDef::new(Teams::ClubColors).string().null())
                    .col(ColumnDef::new(Teams::Website).text().null())
                    .col(ColumnDef::new(Teams::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leagues::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Leagues {
    Table,
    Id,
    FdId,
    Code,
    Name,
    Country,
    CurrentSeason,
    Emblem,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
    FdId,
    Name,
    ShortName,
    Tla,
    Crest,
    Venue,
    Founded,
    ClubColors,
    Website,
    UpdatedAt,
}
