//! PostgreSQL-backed cart repository and its transaction helper

mod cart_repository;
mod tx;

pub use cart_repository::SqlxCartRepository;
pub use tx::{with_tx, QuerierFuture};
