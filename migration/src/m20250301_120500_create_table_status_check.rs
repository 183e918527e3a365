use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StatusCheck::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StatusCheck::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StatusCheck::Uuid).string().not_null().unique_key())
                    .col(ColumnDef::new(StatusCheck::ClientName).string().not_null())
                    .col(ColumnDef::new(StatusCheck::Timestamp).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StatusCheck::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StatusCheck {
    Table,
    Id,
    Uuid,
    ClientName,
    Timestamp,
}
