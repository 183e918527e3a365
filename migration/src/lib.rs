pub use sea_orm_migration::prelude::*;

mod m20250301_120000_create_table_song;
mod m20250301_120100_create_table_favorite;
mod m20250301_120200_create_table_playlist;
mod m20250301_120300_create_table_user_settings;
mod m20250301_120400_create_table_play_history;
mod m20250301_120500_create_table_status_check;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_120000_create_table_song::Migration),
            Box::new(m20250301_120100_create_table_favorite::Migration),
            Box::new(m20250301_120200_create_table_playlist::Migration),
            Box::new(m20250301_120300_create_table_user_settings::Migration),
            Box::new(m20250301_120400_create_table_play_history::Migration),
            Box::new(m20250301_120500_create_table_status_check::Migration),
        ]
    }
}
