//! Persistence gateway.
//!
//! [`Database`] is a cheap, cloneable handle over a small pool of SQLite
//! connections. Every public repository operation runs inside exactly one
//! transaction obtained through [`Database::transaction`] or
//! [`Database::read`]: the closure's `Ok` commits, its `Err` rolls back.

mod courses;
mod enrollments;
mod schema;
mod students;

pub use courses::CourseRepo;
pub use enrollments::EnrollmentService;
pub use students::StudentRepo;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{
    ffi, Connection, ErrorCode, OptionalExtension, Params, Row, Transaction, TransactionBehavior,
};

/// Connections opened for an on-disk database when no size is configured.
pub const DEFAULT_POOL_SIZE: usize = 4;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

type Pool = r2d2::Pool<SqliteConnectionManager>;

/// Failure reported by the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl DbError {
    fn failure(&self) -> Option<&ffi::Error> {
        match self {
            DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => Some(err),
            _ => None,
        }
    }

    /// The write violated a UNIQUE or PRIMARY KEY constraint.
    pub fn is_unique_violation(&self) -> bool {
        self.failure().is_some_and(|err| {
            err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        })
    }

    /// Any constraint violation, unique and foreign key included.
    pub fn is_constraint_violation(&self) -> bool {
        self.failure()
            .is_some_and(|err| err.code == ErrorCode::ConstraintViolation)
    }
}

#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    pub fn open(path: impl AsRef<Path>, pool_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            configure(conn)?;
            conn.pragma_update(None, "journal_mode", "WAL")
        });
        let pool = r2d2::Pool::builder()
            .max_size(pool_size.max(1) as u32)
            .build(manager)?;

        tracing::debug!(path = %path.display(), connections = pool.max_size(), "database opened");

        Ok(Self { pool })
    }

    pub fn open_default(pool_size: usize) -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "matriculas")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("matriculas.db");
        Self::open(db_path, pool_size)
    }

    /// A private in-memory database. Every connection would open its own
    /// empty database, so the pool holds exactly one and never recycles it.
    pub fn open_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| configure(conn));
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?;
        Ok(Self { pool })
    }

    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.pool.get()?;
        schema::ensure(&conn)
    }

    /// Run `f` inside a write transaction.
    ///
    /// The transaction is begun IMMEDIATE so that read-then-write operations
    /// take the write lock up front instead of failing to upgrade later.
    pub fn transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Tx<'_>) -> std::result::Result<T, E>,
        E: From<DbError>,
    {
        self.run(TransactionBehavior::Immediate, f)
    }

    /// Run `f` inside a read transaction, giving it a consistent snapshot.
    pub fn read<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Tx<'_>) -> std::result::Result<T, E>,
        E: From<DbError>,
    {
        self.run(TransactionBehavior::Deferred, f)
    }

    fn run<T, E, F>(&self, behavior: TransactionBehavior, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Tx<'_>) -> std::result::Result<T, E>,
        E: From<DbError>,
    {
        let mut conn = self.pool.get().map_err(DbError::from)?;
        let tx = Tx {
            inner: conn
                .transaction_with_behavior(behavior)
                .map_err(DbError::from)?,
        };

        match f(&tx) {
            Ok(value) => {
                tx.inner.commit().map_err(DbError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.inner.rollback() {
                    tracing::error!(error = %rollback_err, "rollback failed");
                    return Err(DbError::from(rollback_err).into());
                }
                Err(err)
            }
        }
    }
}

fn configure(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)
}

/// An open transaction. Statements issued through it are committed or
/// rolled back together by the [`Database`] call that created it.
pub struct Tx<'conn> {
    inner: Transaction<'conn>,
}

impl Tx<'_> {
    /// Execute a statement, returning the number of affected rows.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> std::result::Result<usize, DbError> {
        Ok(self.inner.execute(sql, params)?)
    }

    /// Execute an INSERT, returning the id assigned to the new row.
    pub fn insert<P: Params>(&self, sql: &str, params: P) -> std::result::Result<i64, DbError> {
        self.inner.execute(sql, params)?;
        Ok(self.inner.last_insert_rowid())
    }

    /// Run a query and map every row, preserving the statement's order.
    pub fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> std::result::Result<Vec<T>, DbError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.inner.prepare_cached(sql)?;
        let rows = stmt
            .query_map(params, map)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Run a query expected to match at most one row.
    pub fn query_opt<T, P, F>(&self, sql: &str, params: P, map: F) -> std::result::Result<Option<T>, DbError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        Ok(self.inner.query_row(sql, params, map).optional()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_db() -> Database {
        let db = Database::open_memory().unwrap();
        db.transaction(|tx| {
            tx.execute(
                "CREATE TABLE scratch (id INTEGER PRIMARY KEY, label TEXT NOT NULL UNIQUE)",
                [],
            )
        })
        .unwrap();
        db
    }

    fn count(db: &Database) -> i64 {
        db.read(|tx| {
            tx.query_opt("SELECT COUNT(*) FROM scratch", [], |row| row.get(0))
                .map(|n| n.unwrap_or(0))
        })
        .unwrap()
    }

    #[test]
    fn ok_closure_commits() {
        let db = scratch_db();
        let id = db
            .transaction(|tx| tx.insert("INSERT INTO scratch (label) VALUES (?)", ["a"]))
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(count(&db), 1);
    }

    #[test]
    fn err_closure_rolls_back_partial_writes() {
        let db = scratch_db();
        let result: std::result::Result<(), DbError> = db.transaction(|tx| {
            tx.insert("INSERT INTO scratch (label) VALUES (?)", ["a"])?;
            tx.insert("INSERT INTO scratch (label) VALUES (?)", ["a"])?;
            Ok(())
        });

        let err = result.unwrap_err();
        assert!(err.is_unique_violation());
        assert!(err.is_constraint_violation());
        assert_eq!(count(&db), 0);
    }

    #[test]
    fn query_preserves_statement_order() {
        let db = scratch_db();
        db.transaction(|tx| {
            for label in ["b", "c", "a"] {
                tx.insert("INSERT INTO scratch (label) VALUES (?)", [label])?;
            }
            Ok::<_, DbError>(())
        })
        .unwrap();

        let labels: Vec<String> = db
            .read(|tx| tx.query("SELECT label FROM scratch ORDER BY label", [], |row| row.get(0)))
            .unwrap();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn query_opt_returns_none_for_no_rows() {
        let db = scratch_db();
        let found: Option<String> = db
            .read(|tx| tx.query_opt("SELECT label FROM scratch WHERE id = ?", [42], |row| row.get(0)))
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn file_database_pools_connections() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("nested").join("test.db"), 3).unwrap();
        assert_eq!(db.pool.max_size(), 3);

        db.ensure_schema().unwrap();
        let clone = db.clone();
        let tables: i64 = clone
            .read(|tx| {
                tx.query_opt(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'matriculas'",
                    [],
                    |row| row.get(0),
                )
                .map(|n| n.unwrap_or(0))
            })
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn waiting_caller_takes_first_released_connection() {
        use std::time::Instant;

        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db"), 2).unwrap();
        let hold = |db: &Database, millis: u64| {
            db.read(|_| {
                std::thread::sleep(Duration::from_millis(millis));
                Ok::<_, DbError>(())
            })
            .unwrap()
        };

        let waited = std::thread::scope(|scope| {
            scope.spawn(|| hold(&db, 1000));
            scope.spawn(|| hold(&db, 50));
            std::thread::sleep(Duration::from_millis(20));

            let started = Instant::now();
            hold(&db, 0);
            started.elapsed()
        });

        assert!(waited < Duration::from_millis(500), "waited {:?}", waited);
    }
}
