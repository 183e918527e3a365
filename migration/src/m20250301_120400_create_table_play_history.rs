use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PlayHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlayHistory::Uuid).string().not_null().unique_key())
                    .col(ColumnDef::new(PlayHistory::SongId).string().not_null())
                    .col(ColumnDef::new(PlayHistory::PlayedDate).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(PlayHistory::PlayDuration).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_play_history_played_date")
                    .table(PlayHistory::Table)
                    .col(PlayHistory::PlayedDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlayHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PlayHistory {
    Table,
    Id,
    Uuid,
    SongId,
    PlayedDate,
    PlayDuration,
}
