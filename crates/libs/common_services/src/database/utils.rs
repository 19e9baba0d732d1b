use app_state::{AppSettings, constants};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Connect to the database from settings and run pending migrations.
///
/// Foreign keys are enabled on every connection, deleting a user or item relies on cascades.
pub async fn get_db_pool(settings: &AppSettings) -> color_eyre::Result<SqlitePool> {
    let db_constants = &constants().database;
    info!("Connecting to database.");
    let options = SqliteConnectOptions::from_str(&settings.secrets.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(db_constants.acquire_timeout));

    let pool = SqlitePoolOptions::new()
        .max_connections(db_constants.max_connections)
        .min_connections(db_constants.min_connections)
        .max_lifetime(Duration::from_secs(db_constants.max_lifetime))
        .idle_timeout(Duration::from_secs(db_constants.idle_timeout))
        .acquire_timeout(Duration::from_secs(db_constants.acquire_timeout))
        .test_before_acquire(true)
        .connect_with(options)
        .await?;

    info!("Running migrations.");
    sqlx::migrate!("../../../migrations").run(&pool).await?;

    Ok(pool)
}

/// Bind a list of ids as one JSON array, to be expanded with `json_each(?)` in SQL.
pub fn ids_json(ids: &[i64]) -> Result<String, serde_json::Error> {
    serde_json::to_string(ids)
}
