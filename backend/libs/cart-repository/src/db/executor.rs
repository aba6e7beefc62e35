//! Executor handle: a pool, or a transaction the caller already opened

use sqlx::{PgPool, Postgres, Transaction};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::Querier;
use crate::error::{CartError, CartResult};

type TxSlot = Option<Transaction<'static, Postgres>>;

/// Where repository queries run
#[derive(Debug, Clone)]
pub enum DbExecutor {
    /// Each query checks out a pooled connection; multi-write units open
    /// their own transaction
    Pool(PgPool),
    /// Every query runs inside the caller's transaction, which the caller
    /// commits or rolls back
    Transaction(TxHandle),
}

impl DbExecutor {
    pub fn is_transaction(&self) -> bool {
        matches!(self, DbExecutor::Transaction(_))
    }

    /// Reject executors that can never run a query
    pub(crate) fn ensure_usable(&self) -> CartResult<()> {
        match self {
            DbExecutor::Pool(pool) if pool.is_closed() => {
                Err(CartError::InvalidExecutor("pool is closed"))
            }
            DbExecutor::Transaction(handle) if !handle.try_is_open() => {
                Err(CartError::InvalidExecutor("transaction is already closed"))
            }
            _ => Ok(()),
        }
    }

    /// Check out something to run queries on
    ///
    /// For a shared transaction this waits for other users of the handle.
    pub(crate) async fn querier(&self) -> QuerierGuard<'_> {
        match self {
            DbExecutor::Pool(pool) => QuerierGuard::Pool(pool.clone()),
            DbExecutor::Transaction(handle) => {
                QuerierGuard::Transaction(handle.inner.lock().await)
            }
        }
    }
}

impl From<PgPool> for DbExecutor {
    fn from(pool: PgPool) -> Self {
        DbExecutor::Pool(pool)
    }
}

impl From<TxHandle> for DbExecutor {
    fn from(handle: TxHandle) -> Self {
        DbExecutor::Transaction(handle)
    }
}

pub(crate) enum QuerierGuard<'a> {
    Pool(PgPool),
    Transaction(MutexGuard<'a, TxSlot>),
}

impl QuerierGuard<'_> {
    pub(crate) fn as_querier(&mut self) -> CartResult<&mut dyn Querier> {
        match self {
            QuerierGuard::Pool(pool) => Ok(pool as &mut dyn Querier),
            QuerierGuard::Transaction(slot) => match slot.as_mut() {
                Some(tx) => Ok(&mut **tx as &mut dyn Querier),
                None => Err(CartError::TransactionClosed),
            },
        }
    }
}

/// Shared handle over an open transaction
///
/// Clones refer to the same transaction. Queries through the handle are
/// serialized since a transaction owns a single connection. Once
/// [`commit`](Self::commit) or [`rollback`](Self::rollback) succeeds or fails,
/// every later use fails with [`CartError::TransactionClosed`]. Dropping the
/// last clone of an unfinished handle rolls the transaction back.
#[derive(Clone)]
pub struct TxHandle {
    inner: Arc<Mutex<TxSlot>>,
}

impl TxHandle {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Begin a transaction on `pool` and wrap it
    pub async fn begin(pool: &PgPool) -> CartResult<Self> {
        let tx = pool.begin().await.map_err(CartError::storage("pool.begin"))?;
        debug!("Opened shared transaction");
        Ok(Self::new(tx))
    }

    pub async fn is_open(&self) -> bool {
        self.inner.lock().await.is_some()
    }

    /// Non-blocking check; a handle that is busy counts as open
    fn try_is_open(&self) -> bool {
        match self.inner.try_lock() {
            Ok(slot) => slot.is_some(),
            Err(_) => true,
        }
    }

    pub async fn commit(&self) -> CartResult<()> {
        let tx = self.take().await?;
        tx.commit().await.map_err(CartError::storage("tx.commit"))?;
        debug!("Committed shared transaction");
        Ok(())
    }

    pub async fn rollback(&self) -> CartResult<()> {
        let tx = self.take().await?;
        tx.rollback().await.map_err(CartError::storage("tx.rollback"))?;
        debug!("Rolled back shared transaction");
        Ok(())
    }

    async fn take(&self) -> CartResult<Transaction<'static, Postgres>> {
        self.inner
            .lock()
            .await
            .take()
            .ok_or(CartError::TransactionClosed)
    }
}

impl fmt::Debug for TxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxHandle")
            .field("open", &self.try_is_open())
            .finish()
    }
}
