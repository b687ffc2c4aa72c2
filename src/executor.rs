use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::{PersistenceError, PersistenceResult};

pub(crate) type PgTransaction = Transaction<'static, Postgres>;

/// Executor shares one PostgreSQL transaction between the repositories of a
/// unit-of-work session.
///
/// The transaction is opened lazily by the first repository call and handed
/// back by `take_transaction` when the session saves or rolls back; the next
/// repository call after that opens a fresh one.
#[derive(Clone, Debug)]
pub struct Executor {
    pool: PgPool,
    tx: Arc<Mutex<Option<PgTransaction>>>,
}

impl Executor {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tx: Arc::new(Mutex::new(None)),
        }
    }

    /// Locks the session transaction, beginning one if none is open.
    pub(crate) async fn acquire(&self) -> PersistenceResult<MutexGuard<'_, Option<PgTransaction>>> {
        let mut guard = self.tx.lock().await;
        if guard.is_none() {
            tracing::debug!("beginning transaction");
            *guard = Some(self.pool.begin().await?);
        }
        Ok(guard)
    }

    /// Takes ownership of the open transaction, if any.
    pub(crate) async fn take_transaction(&self) -> Option<PgTransaction> {
        self.tx.lock().await.take()
    }

    /// True while uncommitted work is pending.
    pub async fn has_pending(&self) -> bool {
        self.tx.lock().await.is_some()
    }
}

/// Borrows the connection out of an acquired guard.
pub(crate) fn connection<'a>(
    guard: &'a mut MutexGuard<'_, Option<PgTransaction>>,
) -> PersistenceResult<&'a mut sqlx::PgConnection> {
    let tx = guard.as_mut().ok_or(PersistenceError::TransactionClosed)?;
    Ok(&mut **tx)
}
