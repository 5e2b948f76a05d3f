use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::debug;

use crate::error::{DbError, Result};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Runs every pending migration and returns how many were applied.
pub fn apply_migrations(conn: &mut SqliteConnection) -> Result<usize> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbError::MigrationError(e.to_string()))?;

    for version in &applied {
        debug!(version = %version, "applied migration");
    }

    Ok(applied.len())
}

/// Returns `true` when the schema is up to date.
pub fn is_up_to_date(conn: &mut SqliteConnection) -> Result<bool> {
    conn.has_pending_migration(MIGRATIONS)
        .map(|pending| !pending)
        .map_err(|e| DbError::MigrationError(e.to_string()))
}
