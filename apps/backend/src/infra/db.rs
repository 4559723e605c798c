//! Database connection and bootstrap.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbOwner, DbProfile};
use crate::error::AppError;

/// Connect to the database at `url` with the standard pool settings.
pub async fn connect_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let mut opts = ConnectOptions::new(url.to_string());
    opts.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    Database::connect(opts)
        .await
        .map_err(|e| AppError::storage_unavailable(format!("Failed to connect to database: {e}")))
}

/// Single entrypoint for runtime startup: connect and apply migrations.
pub async fn bootstrap_db(
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile, owner)?;
    let conn = connect_db(&url).await?;

    migration::migrate(&conn, migration::MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("Migration failed: {e}")))?;

    info!("database bootstrap complete");
    Ok(conn)
}
