//! Transaction helper for units of work that issue more than one write

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::db::{DbExecutor, Querier};
use crate::error::{CartError, CartResult};

/// Future returned by a unit of work, borrowing the querier it was given
pub type QuerierFuture<'c, T> = Pin<Box<dyn Future<Output = CartResult<T>> + Send + 'c>>;

/// Run `f` atomically against `executor`
///
/// With [`DbExecutor::Transaction`] the unit of work runs directly inside the
/// caller's transaction: nothing is begun or committed here. With
/// [`DbExecutor::Pool`] a new transaction is opened, committed when `f`
/// succeeds and rolled back when `f` fails or exceeds `timeout`. A failed
/// rollback is reported together with the error that triggered it.
///
/// `timeout` bounds each step separately: begin, the unit of work (including
/// waiting for a shared transaction handle), commit and rollback. A commit
/// that times out leaves the outcome unknown to the caller.
///
/// If the returned future is dropped mid-flight the transaction is rolled
/// back when sqlx drops it, so every transaction opened here ends in exactly
/// one of commit or rollback.
///
/// ```ignore
/// let written = with_tx(&executor, timeout, move |q| {
///     Box::pin(async move {
///         for params in &batch {
///             q.add_item(params).await.map_err(CartError::storage("q.add_item"))?;
///         }
///         Ok(batch.len())
///     })
/// })
/// .await?;
/// ```
pub async fn with_tx<T, F>(executor: &DbExecutor, timeout: Duration, f: F) -> CartResult<T>
where
    T: Send,
    F: for<'c> FnOnce(&'c mut dyn Querier) -> QuerierFuture<'c, T> + Send,
{
    match executor {
        DbExecutor::Transaction(_) => {
            debug!("Running unit of work inside caller transaction");
            // Waiting for other users of the handle counts against the deadline
            bounded("tx.unit_of_work", timeout, async {
                let mut guard = executor.querier().await;
                let querier = guard.as_querier()?;
                f(querier).await
            })
            .await
        }
        DbExecutor::Pool(pool) => {
            let mut tx = bounded("tx.begin", timeout, async {
                pool.begin().await.map_err(CartError::storage("tx.begin"))
            })
            .await?;

            let querier: &mut dyn Querier = &mut *tx;
            let outcome = bounded("tx.unit_of_work", timeout, f(querier)).await;

            match outcome {
                Ok(value) => {
                    bounded("tx.commit", timeout, async {
                        tx.commit().await.map_err(CartError::storage("tx.commit"))
                    })
                    .await?;
                    debug!("Transaction committed");
                    Ok(value)
                }
                Err(err) => {
                    let rollback = match tokio::time::timeout(timeout, tx.rollback()).await {
                        Ok(result) => result,
                        Err(_) => Err(sqlx::Error::Io(io::Error::new(
                            io::ErrorKind::TimedOut,
                            "rollback timed out",
                        ))),
                    };

                    match rollback {
                        Ok(()) => {
                            warn!(error = %err, "Transaction rolled back");
                            Err(err)
                        }
                        Err(rollback) => {
                            error!(
                                error = %err,
                                rollback_error = %rollback,
                                "Transaction rollback failed"
                            );
                            Err(CartError::Rollback {
                                source: Box::new(err),
                                rollback,
                            })
                        }
                    }
                }
            }
        }
    }
}

/// Fail with [`CartError::Timeout`] if `fut` does not finish within `timeout`
pub(crate) async fn bounded<T, Fut>(
    operation: &'static str,
    timeout: Duration,
    fut: Fut,
) -> CartResult<T>
where
    Fut: Future<Output = CartResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(CartError::Timeout {
            operation,
            after: timeout,
        }),
    }
}
