//! Stock valuation over a date window.

use rust_decimal::Decimal;
use stockledger_core::{DateWindow, OpeningPosition, Transaction, Valuation};

use crate::wac::{rebase, RunningPosition};

/// Value one inventory item over a date window.
///
/// 1. The opening position is re-based to `window.start` by replaying every
///    earlier transaction.
/// 2. The transactions inside the window are replayed from that effective
///    opening. They move the running position to the closing figures and
///    feed the period totals.
///
/// Outbound rows contribute the value they removed at the running average
/// rate, not their recorded amount. An empty transaction list returns the
/// opening position as both opening and closing with zero period totals.
#[must_use]
pub fn compute_valuation(
    opening: &OpeningPosition,
    transactions: &[Transaction],
    window: &DateWindow,
) -> Valuation {
    let effective = rebase(opening, transactions, window);

    let mut position = RunningPosition::new(&effective);
    let mut period_quantity = Decimal::ZERO;
    let mut period_value = Decimal::ZERO;

    for txn in transactions.iter().filter(|txn| window.contains(txn.date)) {
        let change = position.apply(txn.movement());
        period_quantity = period_quantity.saturating_add(change.quantity);
        period_value = period_value.saturating_add(change.value);
    }

    Valuation::rounded(
        (effective.quantity, effective.value),
        (period_quantity, period_value),
        (position.quantity, position.value),
    )
}
