//! Shared database session behind a unit of work.
//!
//! The session owns at most one open transaction. It begins lazily on first
//! use, so reads inside a unit of work see the rows it has staged, and ends
//! on `commit` or `rollback`.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{Error, Result};

pub(crate) struct SessionState {
    tx: Option<Transaction<'static, Sqlite>>,
    pending_rows: u64,
}

impl SessionState {
    /// Connection inside the open transaction, beginning one if needed.
    pub(crate) async fn connection(&mut self, pool: &SqlitePool) -> Result<&mut SqliteConnection> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => {
                debug!("Beginning session transaction");
                pool.begin().await?
            }
        };
        Ok(&mut **self.tx.insert(tx))
    }

    pub(crate) fn record_rows(&mut self, rows: u64) {
        self.pending_rows += rows;
    }
}

pub struct Session {
    pool: SqlitePool,
    actor: Option<String>,
    state: Mutex<SessionState>,
    disposed: AtomicBool,
}

impl Session {
    pub(crate) fn new(pool: SqlitePool, actor: Option<String>) -> Self {
        Self {
            pool,
            actor,
            state: Mutex::new(SessionState {
                tx: None,
                pending_rows: 0,
            }),
            disposed: AtomicBool::new(false),
        }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub(crate) fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_disposed() {
            Err(Error::Disposed)
        } else {
            Ok(())
        }
    }

    /// Exclusive access to the session state.
    pub(crate) async fn lock(&self) -> Result<MutexGuard<'_, SessionState>> {
        self.ensure_open()?;
        let guard = self.state.lock().await;
        // dispose may have won the race for the lock
        self.ensure_open()?;
        Ok(guard)
    }

    /// Commit staged work and return the number of rows it touched.
    pub(crate) async fn commit(&self) -> Result<u64> {
        let mut state = self.lock().await?;
        let rows = std::mem::take(&mut state.pending_rows);
        if let Some(tx) = state.tx.take() {
            tx.commit().await?;
            debug!(rows, "Session transaction committed");
        }
        Ok(rows)
    }

    /// Roll back and close the session. Returns false when already closed.
    pub(crate) async fn close(&self) -> Result<bool> {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return Ok(false);
        }
        let mut state = self.state.lock().await;
        state.pending_rows = 0;
        if let Some(tx) = state.tx.take() {
            tx.rollback().await?;
            debug!("Session transaction rolled back");
        }
        Ok(true)
    }

    /// Synchronous best-effort release for `Drop`.
    pub(crate) fn release(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        match self.state.try_lock() {
            // dropping an open transaction queues its rollback
            Ok(mut state) => drop(state.tx.take()),
            Err(_) => warn!("Session busy during release; transaction left to its owner"),
        }
    }
}
