//! Output records of the valuation engine and balance aggregator.
//!
//! Every record here is flat: plain scalars only, so renderers can write them
//! straight into a table row. Figures are rounded with [`round2`] when a
//! record is constructed and never earlier.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::Item;

/// Voucher label of the synthetic opening row of a stock ledger.
pub const OPENING_BALANCE_LABEL: &str = "Opening Balance";

/// Round a figure to 2 decimal places.
///
/// Halves round to even, and a rounded negative zero is normalised to zero.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Opening, period and closing figures of one inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Valuation {
    /// Quantity at the start of the window.
    pub opening_quantity: Decimal,
    /// Value at the start of the window.
    pub opening_value: Decimal,
    /// Net quantity change inside the window.
    pub period_quantity: Decimal,
    /// Net value change inside the window.
    pub period_value: Decimal,
    /// Quantity at the end of the window.
    pub closing_quantity: Decimal,
    /// Value at the end of the window.
    pub closing_value: Decimal,
}

impl Valuation {
    /// Build a valuation from full-precision running figures.
    #[must_use]
    pub fn rounded(
        opening: (Decimal, Decimal),
        period: (Decimal, Decimal),
        closing: (Decimal, Decimal),
    ) -> Self {
        Self {
            opening_quantity: round2(opening.0),
            opening_value: round2(opening.1),
            period_quantity: round2(period.0),
            period_value: round2(period.1),
            closing_quantity: round2(closing.0),
            closing_value: round2(closing.1),
        }
    }
}

/// A [`Valuation`] tagged with the item it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuationResult {
    /// Item code.
    pub code: i64,
    /// Item name.
    pub name: String,
    /// Figures.
    #[serde(flatten)]
    pub valuation: Valuation,
}

impl ValuationResult {
    /// Attach an item identity to a valuation.
    #[must_use]
    pub fn new(item: &Item, valuation: Valuation) -> Self {
        Self {
            code: item.code,
            name: item.name.clone(),
            valuation,
        }
    }
}

/// One row of a running-balance stock ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRow {
    /// Sequence number; 0 is the synthetic opening row.
    pub seq: usize,
    /// Transaction date. The opening row carries the window start, or the
    /// first transaction date, or nothing when neither exists.
    pub date: Option<NaiveDate>,
    /// Voucher label.
    pub voucher: String,
    /// Quantity before this row.
    pub opening_quantity: Decimal,
    /// Value before this row.
    pub opening_value: Decimal,
    /// Units received.
    pub quantity_in: Decimal,
    /// Units issued.
    pub quantity_out: Decimal,
    /// Quantity after this row.
    pub closing_quantity: Decimal,
    /// Value after this row.
    pub closing_value: Decimal,
    /// Free-text description.
    pub description: String,
}

/// Opening, period and closing balance of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    /// Balance at the start of the window.
    pub opening_balance: Decimal,
    /// Net movement inside the window.
    pub period_amount: Decimal,
    /// Balance at the end of the window.
    pub closing_balance: Decimal,
}

impl BalanceSummary {
    /// Build a summary from full-precision sums.
    #[must_use]
    pub fn rounded(opening: Decimal, period: Decimal, closing: Decimal) -> Self {
        Self {
            opening_balance: round2(opening),
            period_amount: round2(period),
            closing_balance: round2(closing),
        }
    }

    /// Whether the account has anything to report.
    ///
    /// An all-zero account is suppressed by report callers.
    #[must_use]
    pub fn is_reportable(&self) -> bool {
        self.opening_balance.abs() + self.period_amount.abs() + self.closing_balance.abs()
            > Decimal::ZERO
    }
}

/// A [`BalanceSummary`] tagged with the account it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceResult {
    /// Account code.
    pub code: i64,
    /// Account name.
    pub name: String,
    /// Figures.
    #[serde(flatten)]
    pub summary: BalanceSummary,
}

impl BalanceResult {
    /// Attach an account identity to a summary.
    #[must_use]
    pub fn new(item: &Item, summary: BalanceSummary) -> Self {
        Self {
            code: item.code,
            name: item.name.clone(),
            summary,
        }
    }
}
