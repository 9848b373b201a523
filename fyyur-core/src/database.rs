use crate::common::error::{FyyurError, Result};
use libsql::{Builder, Connection, Database, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// How long a connection waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DatabaseManager {
    db: Database,
}

impl DatabaseManager {
    /// Open (creating if needed) a local libSQL database file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening database at {}", path.display());

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| FyyurError::Database {
                message: format!("Failed to open database: {e}"),
            })?;

        Ok(Self { db })
    }

    /// Get a connection with foreign keys enforced. It waits up to
    /// `BUSY_TIMEOUT` while another connection holds the write lock.
    pub async fn get_connection(&self) -> Result<Connection> {
        let conn = self.db.connect().map_err(|e| FyyurError::Database {
            message: format!("Failed to get database connection: {e}"),
        })?;

        pragma(&conn, &format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT.as_millis())).await?;
        pragma(&conn, "PRAGMA foreign_keys = ON").await?;

        Ok(conn)
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        let conn = self.get_connection().await?;

        // Readers keep working while a write is in progress
        pragma(&conn, "PRAGMA journal_mode = WAL").await?;

        let migration_sql_001 = include_str!("../migrations/001_create_venues_artists_shows.sql");
        conn.execute_batch(migration_sql_001)
            .await
            .map_err(|e| FyyurError::Database {
                message: format!("Failed to run base migration: {e}"),
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Clear all data from the database (useful for development)
    pub async fn clear_all_data(&self) -> Result<()> {
        let conn = self.get_connection().await?;
        let tx = begin(&conn).await?;

        // Shows first, they reference both other tables
        let result = tx
            .execute_batch("DELETE FROM shows; DELETE FROM artists; DELETE FROM venues;")
            .await
            .map(|_| ())
            .map_err(|e| FyyurError::Database {
                message: format!("Failed to clear tables: {e}"),
            });
        finish(tx, result).await?;

        info!("Cleared all data from database");
        Ok(())
    }
}

/// Runs a pragma, stepping its result row if it returns one.
async fn pragma(conn: &Connection, sql: &str) -> Result<()> {
    let mut rows = conn.query(sql, ()).await.map_err(|e| FyyurError::Database {
        message: format!("Failed to run '{sql}': {e}"),
    })?;
    rows.next().await.map_err(|e| FyyurError::Database {
        message: format!("Failed to run '{sql}': {e}"),
    })?;
    Ok(())
}

/// Starts an IMMEDIATE transaction: the write lock is taken (or waited for) at `BEGIN`.
pub(crate) async fn begin(conn: &Connection) -> Result<Transaction> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate).await.map_err(|e| FyyurError::Database {
        message: format!("Failed to begin transaction: {e}"),
    })
}

/// Commit when `result` is Ok, roll back otherwise.
pub(crate) async fn finish<T>(tx: Transaction, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await.map_err(|e| FyyurError::Database {
                message: format!("Failed to commit transaction: {e}"),
            })?;
            Ok(value)
        }
        Err(err) => {
            if let Err(e) = tx.rollback().await {
                warn!("Rollback failed after '{}': {}", err, e);
            }
            Err(err)
        }
    }
}
