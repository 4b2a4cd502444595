//! Running-balance stock ledger.
//!
//! A stock ledger lists every transaction of one item inside a window with
//! the position before and after it, preceded by a synthetic opening row.

use std::iter::FusedIterator;
use std::slice;

use rust_decimal::Decimal;
use stockledger_core::{
    round2, DateWindow, LedgerRow, OpeningPosition, Transaction, OPENING_BALANCE_LABEL,
};

use crate::wac::{rebase, RunningPosition};

/// Build the stock ledger of one item.
///
/// The opening position is re-based to `window.start` exactly as
/// [`compute_valuation`](crate::compute_valuation) does. A sequence-0
/// opening row is emitted when the effective opening quantity is positive or
/// the effective opening value is non-zero; a negative quantity with zero
/// value produces no opening row. Transactions inside the window follow,
/// numbered from 1.
///
/// The returned iterator is lazy and single-use. Each call recomputes from
/// scratch.
#[must_use]
pub fn build_ledger<'a>(
    opening: &OpeningPosition,
    transactions: &'a [Transaction],
    window: &DateWindow,
) -> LedgerRows<'a> {
    let effective = rebase(opening, transactions, window);

    let opening_row = if effective.quantity > Decimal::ZERO || !effective.value.is_zero() {
        let date = window.start.or_else(|| {
            transactions
                .iter()
                .find(|txn| window.contains(txn.date))
                .map(|txn| txn.date)
        });
        let description = window.start.map_or_else(
            || OPENING_BALANCE_LABEL.to_string(),
            |start| format!("{OPENING_BALANCE_LABEL} as of {start}"),
        );
        Some(LedgerRow {
            seq: 0,
            date,
            voucher: OPENING_BALANCE_LABEL.to_string(),
            opening_quantity: Decimal::ZERO,
            opening_value: Decimal::ZERO,
            quantity_in: round2(effective.quantity),
            quantity_out: Decimal::ZERO,
            closing_quantity: round2(effective.quantity),
            closing_value: round2(effective.value),
            description,
        })
    } else {
        None
    };

    LedgerRows {
        opening_row,
        transactions: transactions.iter(),
        window: *window,
        position: RunningPosition::new(&effective),
        seq: 0,
    }
}

/// Lazy iterator over the rows of a stock ledger.
///
/// Created by [`build_ledger`].
#[derive(Debug, Clone)]
pub struct LedgerRows<'a> {
    opening_row: Option<LedgerRow>,
    transactions: slice::Iter<'a, Transaction>,
    window: DateWindow,
    position: RunningPosition,
    seq: usize,
}

impl Iterator for LedgerRows<'_> {
    type Item = LedgerRow;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(row) = self.opening_row.take() {
            return Some(row);
        }

        let window = self.window;
        let txn = self
            .transactions
            .by_ref()
            .find(|txn| window.contains(txn.date))?;

        self.seq += 1;
        let before = self.position;
        let movement = txn.movement();
        self.position.apply(movement);

        Some(LedgerRow {
            seq: self.seq,
            date: Some(txn.date),
            voucher: txn.voucher_label(self.seq),
            opening_quantity: round2(before.quantity),
            opening_value: round2(before.value),
            quantity_in: round2(movement.quantity_in()),
            quantity_out: round2(movement.quantity_out()),
            closing_quantity: round2(self.position.quantity),
            closing_value: round2(self.position.value),
            description: txn.description(),
        })
    }
}

impl FusedIterator for LedgerRows<'_> {}
