//! Cart persistence for PostgreSQL
//!
//! Stores shopping-cart line items keyed by `(owner_id, product_id)` and
//! exposes them through the [`CartRepository`] port:
//!
//! - [`CartRepository::get_cart`] lists every item an owner has
//! - [`CartRepository::add_item`] inserts an item or overwrites its price
//! - [`CartRepository::add_items`] does the same for a batch, atomically
//! - [`CartRepository::delete_item`] removes one item and reports whether it existed
//!
//! A repository runs either on a pool or inside a transaction the caller
//! already owns ([`DbExecutor`]). [`with_tx`] turns any multi-write unit of
//! work into an atomic one without caring which of the two it was given.
//!
//! ## Example
//!
//! ```ignore
//! use cart_repository::{CartItem, CartRepository, Money, SqlxCartRepository, TxHandle};
//!
//! let repo = SqlxCartRepository::new(pool.clone())?;
//! repo.add_item("alice", &CartItem::new(product_id, Money::from_code(amount, "USD")?))
//!     .await?;
//!
//! // Join a transaction opened by the caller
//! let tx = TxHandle::begin(&pool).await?;
//! let in_tx = SqlxCartRepository::new(tx.clone())?;
//! in_tx.delete_item("alice", product_id).await?;
//! tx.commit().await?;
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod port;
pub mod repository;
pub mod telemetry;

pub use config::RepositoryConfig;
pub use db::{DbExecutor, Querier, TxHandle};
pub use domain::{Cart, CartItem, Money};
pub use error::{CartError, CartResult, ValidationError};
pub use port::CartRepository;
pub use repository::{with_tx, QuerierFuture, SqlxCartRepository};

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Schema migrations for the `cart_items` table
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply pending migrations to `pool`
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Cart repository migrations applied");
    Ok(())
}
