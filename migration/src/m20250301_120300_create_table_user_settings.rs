use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserSettings::Uuid).string().not_null().unique_key())
                    .col(ColumnDef::new(UserSettings::SelectedFolders).json().not_null())
                    .col(ColumnDef::new(UserSettings::ShuffleMode).boolean().not_null())
                    .col(ColumnDef::new(UserSettings::RepeatMode).string().not_null())
                    .col(ColumnDef::new(UserSettings::Volume).double().not_null())
                    .col(ColumnDef::new(UserSettings::EqualizerPreset).string().not_null())
                    .col(ColumnDef::new(UserSettings::UpdatedDate).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserSettings {
    Table,
    Id,
    Uuid,
    SelectedFolders,
    ShuffleMode,
    RepeatMode,
    Volume,
    EqualizerPreset,
    UpdatedDate,
}
