use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::money::Money;

/// A priced line in a cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_id: Uuid,
    pub price: Money,
    /// Assigned by storage on first insert; ignored on writes
    pub created_at: DateTime<Utc>,
}

impl CartItem {
    /// New item whose creation time is left for storage to assign
    pub fn new(product_id: Uuid, price: Money) -> Self {
        Self {
            product_id,
            price,
            created_at: DateTime::<Utc>::default(),
        }
    }
}

/// The items currently associated with an owner
///
/// Not stored as a row of its own; item order is not meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub owner_id: String,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn empty(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn item(&self, product_id: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Sum of item prices per currency code
    pub fn totals(&self) -> BTreeMap<&'static str, Decimal> {
        let mut totals = BTreeMap::new();
        for item in &self.items {
            *totals
                .entry(item.price.currency_code())
                .or_insert(Decimal::ZERO) += item.price.amount;
        }
        totals
    }
}
