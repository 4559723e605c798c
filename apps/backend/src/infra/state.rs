use sea_orm::DatabaseConnection;

use crate::config::db::{DbOwner, DbProfile};
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
#[derive(Default)]
pub struct StateBuilder {
    db_profile: Option<DbProfile>,
    db_connection: Option<DatabaseConnection>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            db_profile: None,
            db_connection: None,
        }
    }

    /// Connect and migrate a database for the given profile.
    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    /// Use an already-open connection (tests hand in migrated sqlite here).
    pub fn with_connection(mut self, conn: DatabaseConnection) -> Self {
        self.db_connection = Some(conn);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        if let Some(conn) = self.db_connection {
            return Ok(AppState::new(conn));
        }
        if let Some(profile) = self.db_profile {
            // single entrypoint: build + migrate
            let conn = bootstrap_db(profile, DbOwner::App).await?;
            return Ok(AppState::new(conn));
        }
        Ok(AppState::new_without_db())
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
