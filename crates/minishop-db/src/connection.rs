//! Database connection management.
//!
//! A [`DbConnection`] owns one SQLite connection with foreign keys enforced
//! and the embedded schema migrations applied.

use std::path::Path;

use diesel::{sql_query, Connection, RunQueryDsl, SqliteConnection};
use tracing::debug;

use crate::{error::Result, migration::apply_migrations};

/// Database connection wrapper with migration support.
pub struct DbConnection {
    conn: SqliteConnection,
}

impl DbConnection {
    /// Opens a database file, creating it when missing, and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy();
        debug!(path = %path_str, "opening database");
        let mut conn = SqliteConnection::establish(&path_str)?;

        // WAL mode for better concurrent access
        sql_query("PRAGMA journal_mode = WAL;").execute(&mut conn)?;

        Self::prepare(conn)
    }

    /// Opens a private in-memory database with the schema applied.
    pub fn open_in_memory() -> Result<Self> {
        let conn = SqliteConnection::establish(":memory:")?;
        Self::prepare(conn)
    }

    fn prepare(mut conn: SqliteConnection) -> Result<Self> {
        sql_query("PRAGMA foreign_keys = ON;").execute(&mut conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Gets a mutable reference to the underlying connection.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

impl std::ops::Deref for DbConnection {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl std::ops::DerefMut for DbConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;
    use tempfile::tempdir;

    use super::*;
    use crate::{error::DbError, migration::is_up_to_date, schema::teams};

    #[test]
    fn test_open_in_memory_applies_schema() {
        let mut db = DbConnection::open_in_memory().unwrap();

        assert!(is_up_to_date(db.conn()).unwrap());
        let count: i64 = teams::table.count().get_result(db.conn()).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_file_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shop.db");

        {
            let mut db = DbConnection::open(&path).unwrap();
            diesel::insert_into(teams::table)
                .values(teams::name.eq("teamA"))
                .execute(db.conn())
                .unwrap();
        }

        let mut db = DbConnection::open(&path).unwrap();
        let names: Vec<String> = teams::table.select(teams::name).load(db.conn()).unwrap();
        assert_eq!(names, vec!["teamA".to_string()]);
    }

    #[test]
    fn test_foreign_keys_are_enforced() {
        let mut db = DbConnection::open_in_memory().unwrap();

        let err = sql_query("INSERT INTO members (username, age, team_id) VALUES ('ghost', 1, 99)")
            .execute(db.conn())
            .unwrap_err();

        assert!(matches!(
            DbError::from(err),
            DbError::ConstraintViolation(_)
        ));
    }
}
