use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Cart, CartItem};
use crate::error::CartResult;

/// Cart persistence as seen by the rest of the application
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// All items stored for `owner_id`; an owner with no items gets an empty cart
    async fn get_cart(&self, owner_id: &str) -> CartResult<Cart>;

    /// Insert `item`, or overwrite the price of the owner's existing line for
    /// the same product
    async fn add_item(&self, owner_id: &str, item: &CartItem) -> CartResult<()>;

    /// Upsert several items atomically, returning how many were written
    async fn add_items(&self, owner_id: &str, items: &[CartItem]) -> CartResult<usize>;

    /// Remove one line; `Ok(false)` when there was nothing to remove
    async fn delete_item(&self, owner_id: &str, product_id: Uuid) -> CartResult<bool>;
}
