//! Shared database handle.

use std::{
    fs,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use diesel::{Connection as DieselConnection, QueryResult, SqliteConnection};
use minishop_db::connection::DbConnection;
use tracing::debug;

use crate::{
    error::{ErrorContext, ShopError},
    ShopResult,
};

/// Thread-safe wrapper around a [`DbConnection`].
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<DbConnection>>,
}

impl Database {
    /// Opens the database at `path`, creating its directory when needed.
    pub fn open<P: AsRef<Path>>(path: P) -> ShopResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }

        let conn = DbConnection::open(path)?;
        debug!(path = %path.display(), "database ready");
        Ok(Self::from_connection(conn))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> ShopResult<Self> {
        Ok(Self::from_connection(DbConnection::open_in_memory()?))
    }

    fn from_connection(conn: DbConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Locks the connection and returns the guard.
    pub fn conn(&self) -> ShopResult<MutexGuard<'_, DbConnection>> {
        self.conn.lock().map_err(|_| ShopError::PoisonError)
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> ShopResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> QueryResult<T>,
    {
        let mut conn = self.conn()?;
        Ok(f(conn.conn())?)
    }

    /// Runs `f` inside a transaction. The transaction commits when `f`
    /// returns `Ok` and rolls back on `Err`.
    pub fn transaction<F, T>(&self, f: F) -> ShopResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> ShopResult<T>,
    {
        let mut conn = self.conn()?;
        conn.conn().transaction(f)
    }
}

#[cfg(test)]
mod tests {
    use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
    use minishop_db::schema::teams;
    use tempfile::tempdir;

    use super::*;

    fn team_count(db: &Database) -> i64 {
        db.with_conn(|conn| teams::table.count().get_result(conn))
            .unwrap()
    }

    #[test]
    fn test_transaction_commits_on_ok() {
        let db = Database::open_in_memory().unwrap();

        db.transaction(|conn| {
            diesel::insert_into(teams::table)
                .values(teams::name.eq("teamA"))
                .execute(conn)?;
            Ok(())
        })
        .unwrap();

        assert_eq!(team_count(&db), 1);
    }

    #[test]
    fn test_transaction_rolls_back_on_err() {
        let db = Database::open_in_memory().unwrap();

        let result: ShopResult<()> = db.transaction(|conn| {
            diesel::insert_into(teams::table)
                .values(teams::name.eq("teamA"))
                .execute(conn)?;
            Err(ShopError::Custom("abort".into()))
        });

        assert!(matches!(result, Err(ShopError::Custom(_))));
        assert_eq!(team_count(&db), 0);
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("shop.db");

        let db = Database::open(&path).unwrap();
        assert_eq!(team_count(&db), 0);
        assert!(path.exists());
    }
}
