use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use std::fmt;

use crate::error::{CartError, CartResult};

/// An amount in a specific ISO 4217 currency
///
/// Negative amounts are representable; rejecting them is left to callers.
#[derive(Clone, Copy, PartialEq)]
pub struct Money {
    pub amount: Decimal,
    pub currency: &'static Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: &'static Currency) -> Self {
        Self { amount, currency }
    }

    /// Build from a currency code such as `"USD"`
    pub fn from_code(amount: Decimal, code: &str) -> CartResult<Self> {
        let currency =
            parse_currency(code).ok_or_else(|| CartError::UnknownCurrency(code.to_string()))?;
        Ok(Self::new(amount, currency))
    }

    /// ISO 4217 alphabetic code of the currency
    pub fn currency_code(&self) -> &'static str {
        self.currency.iso_alpha_code
    }
}

impl fmt::Debug for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Money")
            .field("amount", &self.amount)
            .field("currency", &self.currency_code())
            .finish()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency_code())
    }
}

/// Look up an ISO 4217 currency by its alphabetic code
///
/// Case-insensitive. Storage pads `CHAR(3)` values, so surrounding
/// whitespace is ignored.
pub fn parse_currency(code: &str) -> Option<&'static Currency> {
    iso::find(&code.trim().to_ascii_uppercase())
}
