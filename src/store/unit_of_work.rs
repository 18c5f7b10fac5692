//! Unit of work
//!
//! Runs a closure against a single transaction. The transaction commits when
//! the closure returns `Ok` and rolls back on `Err`; a panic or a dropped
//! future also rolls back because `Transaction` aborts on drop.

use std::future::Future;
use std::pin::Pin;

use sqlx::{PgPool, Postgres, Transaction};

/// Boxed future returned by a unit-of-work closure
pub type TxFuture<'c, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>;

/// Execute `work` inside a transaction with all-or-nothing semantics.
///
/// ```ignore
/// let id = in_transaction(&pool, move |tx| {
///     Box::pin(async move {
///         sqlx::query("INSERT ...").execute(&mut **tx).await?;
///         Ok::<_, AppError>(id)
///     })
/// })
/// .await?;
/// ```
pub async fn in_transaction<T, E, F>(pool: &PgPool, work: F) -> Result<T, E>
where
    F: for<'c> FnOnce(&'c mut Transaction<'static, Postgres>) -> TxFuture<'c, T, E>,
    E: From<sqlx::Error>,
{
    let mut tx = pool.begin().await?;

    match work(&mut tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(e)
        }
    }
}
