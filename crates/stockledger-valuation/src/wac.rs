//! The weighted-average mutation rule.
//!
//! [`RunningPosition::apply`] is the single place where a transaction changes
//! a position. Valuation, re-basing and the stock ledger all go through it.

use rust_decimal::Decimal;
use stockledger_core::{DateWindow, Movement, OpeningPosition, Transaction};

/// Quantity and value held while replaying transactions.
///
/// Figures keep full precision; rounding happens only when a result record
/// is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningPosition {
    /// Units held.
    pub quantity: Decimal,
    /// Total value held.
    pub value: Decimal,
}

/// The signed change one movement made to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionChange {
    /// Quantity change.
    pub quantity: Decimal,
    /// Value change.
    pub value: Decimal,
}

impl RunningPosition {
    /// Start from an opening position.
    #[must_use]
    pub const fn new(opening: &OpeningPosition) -> Self {
        Self {
            quantity: opening.quantity,
            value: opening.value,
        }
    }

    /// Current average cost per unit.
    ///
    /// Zero while the quantity is zero, or when the rate does not fit in a
    /// `Decimal`.
    #[must_use]
    pub fn average_rate(&self) -> Decimal {
        self.value
            .checked_div(self.quantity)
            .unwrap_or(Decimal::ZERO)
    }

    /// Value taken out by issuing `quantity` units at the average rate.
    ///
    /// When the rate itself overflows, the issued share of the held value is
    /// used instead. Products saturate.
    fn issued_value(&self, quantity: Decimal) -> Decimal {
        if self.quantity.is_zero() {
            return Decimal::ZERO;
        }
        match self.value.checked_div(self.quantity) {
            Some(rate) => quantity.saturating_mul(rate),
            None => quantity
                .checked_div(self.quantity)
                .map_or(Decimal::ZERO, |share| self.value.saturating_mul(share)),
        }
    }

    /// Apply one movement and return the change it made.
    ///
    /// Inbound movements add their recorded amount. Outbound movements remove
    /// value at the current average rate. At zero quantity that rate is zero,
    /// so an issue leaves the value untouched and drives the quantity
    /// negative. Sums saturate at the `Decimal` range instead of panicking.
    pub fn apply(&mut self, movement: Movement) -> PositionChange {
        match movement {
            Movement::Inbound { quantity, amount } => {
                self.quantity = self.quantity.saturating_add(quantity);
                self.value = self.value.saturating_add(amount);
                PositionChange {
                    quantity,
                    value: amount,
                }
            }
            Movement::Outbound { quantity } => {
                let removed = self.issued_value(quantity);
                self.value = self.value.saturating_sub(removed);
                self.quantity = self.quantity.saturating_sub(quantity);
                PositionChange {
                    quantity: -quantity,
                    value: -removed,
                }
            }
            Movement::Inert => PositionChange::default(),
        }
    }

    /// Freeze the running figures into an opening position.
    #[must_use]
    pub const fn to_opening(self) -> OpeningPosition {
        OpeningPosition::new(self.quantity, self.value)
    }
}

/// Re-base an opening position to the start of a window.
///
/// Replays every transaction dated strictly before `window.start`, stopping
/// at the first one on or after it. Without a start bound the opening
/// position is returned unchanged.
#[must_use]
pub fn rebase(
    opening: &OpeningPosition,
    transactions: &[Transaction],
    window: &DateWindow,
) -> OpeningPosition {
    if window.start.is_none() {
        return *opening;
    }

    let mut position = RunningPosition::new(opening);
    for txn in transactions
        .iter()
        .take_while(|txn| window.is_before_start(txn.date))
    {
        position.apply(txn.movement());
    }
    position.to_opening()
}
