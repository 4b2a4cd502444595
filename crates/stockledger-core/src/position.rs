//! Opening position of an item.
//!
//! The source system stores one opening row per master ("folio"). For
//! inventory items it holds a quantity and a value; for accounts only the
//! first figure is meaningful and is read as a balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opening quantity and value of an item.
///
/// A missing opening row is the same as a zero position.
///
/// # Examples
///
/// ```
/// use stockledger_core::OpeningPosition;
/// use rust_decimal_macros::dec;
///
/// let opening = OpeningPosition::new(dec!(100), dec!(1000));
/// assert_eq!(opening.average_rate(), dec!(10));
///
/// // Accounts read the first figure as their balance
/// assert_eq!(OpeningPosition::balance_of(dec!(500)).balance(), dec!(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpeningPosition {
    /// Opening quantity (for accounts: opening balance).
    pub quantity: Decimal,
    /// Opening value.
    pub value: Decimal,
}

impl OpeningPosition {
    /// Create a new opening position.
    #[must_use]
    pub const fn new(quantity: Decimal, value: Decimal) -> Self {
        Self { quantity, value }
    }

    /// A zero position, used when an item has no opening row.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            quantity: Decimal::ZERO,
            value: Decimal::ZERO,
        }
    }

    /// Opening position of an account with the given balance.
    #[must_use]
    pub const fn balance_of(balance: Decimal) -> Self {
        Self {
            quantity: balance,
            value: Decimal::ZERO,
        }
    }

    /// The opening balance of an account.
    #[must_use]
    pub const fn balance(&self) -> Decimal {
        self.quantity
    }

    /// Average cost per unit, zero when the quantity is zero.
    #[must_use]
    pub fn average_rate(&self) -> Decimal {
        self.value
            .checked_div(self.quantity)
            .unwrap_or(Decimal::ZERO)
    }

    /// Check if both figures are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.quantity.is_zero() && self.value.is_zero()
    }
}
