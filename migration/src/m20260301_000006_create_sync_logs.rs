use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per envelope transition: running, retrying, success, failed
        manager
            .create_table(
                Table::create()
                    .table(SyncLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SyncLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SyncLogs::Source).string_len(64).not_null())
                    .col(ColumnDef::new(SyncLogs::TaskType).string_len(64).not_null())
                    .col(ColumnDef::new(SyncLogs::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(SyncLogs::RecordsCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SyncLogs::ErrorMessage).text().null())
                    .col(ColumnDef::new(SyncLogs::StartedAt).timestamp().not_null())
                    .col(ColumnDef::new(SyncLogs::FinishedAt).timestamp().null())
                    .col(
                        ColumnDef::new(SyncLogs::RetryCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sync_logs_source_started")
                    .table(SyncLogs::Table)
                    .col(SyncLogs::Source)
                    .col((SyncLogs::StartedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SyncLogs {
    Table,
    Id,
    Source,
    TaskType,
    Status,
    RecordsCount,
    ErrorMessage,
    StartedAt,
    FinishedAt,
    RetryCount,
}
