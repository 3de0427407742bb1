//! Process-wide store handle.
//!
//! One SQLite connection is opened at startup, shared behind a mutex, and
//! closed explicitly on shutdown. Handlers receive it through router state.

use std::path::Path;
use std::sync::{Arc, Mutex};

use log::{info, warn};
use portfolio_core::db::{open_db, open_db_in_memory, DbError};
use portfolio_core::{RepoError, RepoResult};
use rusqlite::Connection;

use crate::error::AppError;

/// Shared handle to the catalog store. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn in_memory() -> Result<Self, DbError> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs a blocking store operation off the async executor.
    ///
    /// Operations are serialized on the single connection.
    pub async fn run<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> RepoResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| AppError::StorePoisoned)?;
            op(&mut *guard).map_err(AppError::from)
        })
        .await
        .map_err(|err| AppError::Internal(format!("store task join: {err}")))?
    }

    /// Closes the connection if this is the last handle.
    pub fn close(self) -> Result<(), AppError> {
        let mutex = match Arc::try_unwrap(self.conn) {
            Ok(mutex) => mutex,
            Err(_) => {
                warn!("event=store_close module=state status=skipped reason=handle_still_shared");
                return Ok(());
            }
        };

        let conn = mutex.into_inner().map_err(|_| AppError::StorePoisoned)?;
        conn.close()
            .map_err(|(_, err)| AppError::Repo(RepoError::from(err)))?;
        info!("event=store_close module=state status=ok");
        Ok(())
    }
}

/// Router state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}
