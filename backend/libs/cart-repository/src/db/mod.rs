//! Query bindings for the `cart_items` table
//!
//! Row and parameter structs mirror the table one-to-one and know nothing of
//! the domain types. [`Querier`] is the capability set the repository needs;
//! it is implemented for [`PgPool`] (each call checks out a pooled connection)
//! and for [`PgConnection`], which an open [`sqlx::Transaction`] dereferences
//! to, so the same code runs inside or outside a transaction.

pub mod executor;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub use executor::{DbExecutor, TxHandle};

const GET_CART: &str = r#"
    SELECT product_id, price_amount, price_currency, created_at
    FROM cart_items
    WHERE owner_id = $1
"#;

const ADD_ITEM: &str = r#"
    INSERT INTO cart_items (owner_id, product_id, price_amount, price_currency)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (owner_id, product_id) DO UPDATE
    SET price_amount = EXCLUDED.price_amount,
        price_currency = EXCLUDED.price_currency
"#;

const DELETE_ITEM: &str = r#"
    DELETE FROM cart_items
    WHERE owner_id = $1 AND product_id = $2
"#;

/// One stored cart line as returned by [`Querier::get_cart`]
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct GetCartRow {
    pub product_id: Uuid,
    pub price_amount: Decimal,
    pub price_currency: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddItemParams {
    pub owner_id: String,
    pub product_id: Uuid,
    pub price_amount: Decimal,
    pub price_currency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteItemParams {
    pub owner_id: String,
    pub product_id: Uuid,
}

/// Queries the cart repository can issue against any executor
#[async_trait]
pub trait Querier: Send {
    /// All lines stored for `owner_id`, in no particular order
    async fn get_cart(&mut self, owner_id: &str) -> Result<Vec<GetCartRow>, sqlx::Error>;

    /// Insert a line, or overwrite the price of an existing one
    async fn add_item(&mut self, params: &AddItemParams) -> Result<(), sqlx::Error>;

    /// Remove a line, returning the number of rows deleted
    async fn delete_item(&mut self, params: &DeleteItemParams) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl Querier for PgPool {
    async fn get_cart(&mut self, owner_id: &str) -> Result<Vec<GetCartRow>, sqlx::Error> {
        sqlx::query_as::<_, GetCartRow>(GET_CART)
            .bind(owner_id)
            .fetch_all(&*self)
            .await
    }

    async fn add_item(&mut self, params: &AddItemParams) -> Result<(), sqlx::Error> {
        sqlx::query(ADD_ITEM)
            .bind(&params.owner_id)
            .bind(params.product_id)
            .bind(params.price_amount)
            .bind(&params.price_currency)
            .execute(&*self)
            .await?;
        Ok(())
    }

    async fn delete_item(&mut self, params: &DeleteItemParams) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(DELETE_ITEM)
            .bind(&params.owner_id)
            .bind(params.product_id)
            .execute(&*self)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl Querier for PgConnection {
    async fn get_cart(&mut self, owner_id: &str) -> Result<Vec<GetCartRow>, sqlx::Error> {
        sqlx::query_as::<_, GetCartRow>(GET_CART)
            .bind(owner_id)
            .fetch_all(&mut *self)
            .await
    }

    async fn add_item(&mut self, params: &AddItemParams) -> Result<(), sqlx::Error> {
        sqlx::query(ADD_ITEM)
            .bind(&params.owner_id)
            .bind(params.product_id)
            .bind(params.price_amount)
            .bind(&params.price_currency)
            .execute(&mut *self)
            .await?;
        Ok(())
    }

    async fn delete_item(&mut self, params: &DeleteItemParams) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(DELETE_ITEM)
            .bind(&params.owner_id)
            .bind(params.product_id)
            .execute(&mut *self)
            .await?;
        Ok(result.rows_affected())
    }
}
