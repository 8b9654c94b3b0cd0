use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use sea_orm_migration::MigratorTrait;
use showroom_shared::ShowroomError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::ConnectOptions;
use tracing::debug;

use crate::migration::Migrator;

// Start the database at the given path
pub async fn new(db_path: &Path) -> Result<DatabaseConnection, ShowroomError> {
    start_db(Some(db_path)).await
}

/// Opens (creating if needed) the database and brings the schema up to date.
/// `None` gives a private in-memory database.
pub async fn start_db(db_path: Option<&Path>) -> Result<DatabaseConnection, ShowroomError> {
    let db_url = match db_path {
        Some(path) => format!("sqlite://{}?mode=rwc", path.display()),
        None => "sqlite::memory:".to_string(),
    };
    debug!("Opening Database: {db_url}");

    let options = SqliteConnectOptions::from_str(&db_url)
        .map_err(|err| ShowroomError::DatabaseError(format!("invalid database url: {err:?}")))?
        .foreign_keys(true)
        .log_statements(log::LevelFilter::Trace)
        .log_slow_statements(log::LevelFilter::Warn, Duration::from_millis(500));

    let pool_options = match db_path {
        Some(_) => SqlitePoolOptions::new(),
        // every connection to :memory: is its own database, so keep exactly one alive
        None => SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None),
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|err| ShowroomError::DatabaseError(format!("connection failed: {err:?}")))?;

    let conn = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
    Migrator::up(&conn, None).await?;

    Ok(conn)
}
