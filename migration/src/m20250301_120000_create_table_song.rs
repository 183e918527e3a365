use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Song::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Song::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Song::Uuid).string().not_null().unique_key())
                    .col(ColumnDef::new(Song::Title).string().not_null())
                    .col(ColumnDef::new(Song::Artist).string().not_null())
                    .col(ColumnDef::new(Song::Album).string().not_null())
                    .col(ColumnDef::new(Song::Duration).integer().not_null())
                    .col(ColumnDef::new(Song::FilePath).string().not_null())
                    .col(ColumnDef::new(Song::FolderPath).string().not_null())
                    .col(ColumnDef::new(Song::Artwork).text().null())
                    .col(ColumnDef::new(Song::Format).string().not_null())
                    .col(ColumnDef::new(Song::Size).big_integer().not_null())
                    .col(ColumnDef::new(Song::AddedDate).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_song_folder_path")
                    .table(Song::Table)
                    .col(Song::FolderPath)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Song::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Song {
    Table,
    Id,
    Uuid,
    Title,
    Artist,
    Album,
    Duration,
    FilePath,
    FolderPath,
    Artwork,
    Format,
    Size,
    AddedDate,
}
