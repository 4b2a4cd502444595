//! Signed-sum balances for accounts.

use rust_decimal::Decimal;
use stockledger_core::{BalanceSummary, DateWindow, Transaction};

/// Aggregate an account's movements over a date window.
///
/// - opening: base balance plus every delta dated before `window.start`
/// - period: sum of deltas inside the window
/// - closing: base balance plus every delta up to `window.end`
///
/// There is no averaging here. The summary is always returned, including
/// for all-zero accounts; suppressing those is up to the caller.
#[must_use]
pub fn compute_balance(
    opening_balance: Decimal,
    transactions: &[Transaction],
    window: &DateWindow,
) -> BalanceSummary {
    let mut before = Decimal::ZERO;
    let mut period = Decimal::ZERO;
    let mut through_end = Decimal::ZERO;

    for txn in transactions {
        let delta = txn.account_delta();
        if window.is_before_start(txn.date) {
            before = before.saturating_add(delta);
        } else if !window.is_after_end(txn.date) {
            period = period.saturating_add(delta);
        }
        if !window.is_after_end(txn.date) {
            through_end = through_end.saturating_add(delta);
        }
    }

    BalanceSummary::rounded(
        opening_balance.saturating_add(before),
        period,
        opening_balance.saturating_add(through_end),
    )
}
