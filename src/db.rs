use std::time::Duration;

use log::info;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use migration::{Migrator, MigratorTrait};

/// Opens the store and brings its schema up to date.
///
/// The returned connection is the only store handle in the process. It is shared through
/// `AppState` and should be closed with `DatabaseConnection::close` on shutdown.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;
    Migrator::up(&db, None).await?;
    info!("Connected to store, schema is up to date");

    Ok(db)
}
