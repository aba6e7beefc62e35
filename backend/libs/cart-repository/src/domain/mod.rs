//! Cart domain models
//!
//! Plain values with no knowledge of how they are stored.

mod cart;
mod money;

pub use cart::{Cart, CartItem};
pub use money::{parse_currency, Money};
