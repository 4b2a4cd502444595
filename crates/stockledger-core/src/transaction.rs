//! Transaction events and their classification.
//!
//! A [`Transaction`] is one row of the source system's transaction table for a
//! single master. Its sign decides the [`Movement`]: positive quantities are
//! inbound (purchases), negative quantities outbound (sales), zero is inert.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort transactions by date.
///
/// The sort is stable, so transactions on the same date keep their current
/// relative order. Providers that store rows in insertion order call this to
/// get the (date, insertion order) replay order the engine expects.
pub fn sort_transactions(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| a.date.cmp(&b.date));
}

/// A dated movement of one master.
///
/// `quantity` is the signed primary value column. For inventory items it is
/// the quantity delta; for accounts it carries the signed monetary movement.
/// `amount` is the monetary value recorded with the row. Only inbound rows
/// use it; the value of an outbound row is derived from the running average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Master code this transaction belongs to.
    pub code: i64,
    /// Transaction date
    pub date: NaiveDate,
    /// Voucher number (opaque, may be empty)
    pub voucher_no: String,
    /// Voucher type tag
    pub voucher_type: i32,
    /// Record type, used as a recency indicator on re-import
    pub rec_type: i32,
    /// Signed quantity delta
    pub quantity: Decimal,
    /// Recorded monetary amount
    pub amount: Decimal,
}

impl Transaction {
    /// Create a new transaction with a zero amount and no voucher.
    #[must_use]
    pub const fn new(code: i64, date: NaiveDate, quantity: Decimal) -> Self {
        Self {
            code,
            date,
            voucher_no: String::new(),
            voucher_type: 0,
            rec_type: 0,
            quantity,
            amount: Decimal::ZERO,
        }
    }

    /// Set the recorded amount.
    #[must_use]
    pub const fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    /// Set the voucher number.
    #[must_use]
    pub fn with_voucher(mut self, voucher_no: impl Into<String>) -> Self {
        self.voucher_no = voucher_no.into();
        self
    }

    /// Set the voucher type.
    #[must_use]
    pub const fn with_voucher_type(mut self, voucher_type: i32) -> Self {
        self.voucher_type = voucher_type;
        self
    }

    /// Set the record type.
    #[must_use]
    pub const fn with_rec_type(mut self, rec_type: i32) -> Self {
        self.rec_type = rec_type;
        self
    }

    /// Classify this transaction for valuation.
    #[must_use]
    pub fn movement(&self) -> Movement {
        match self.quantity.cmp(&Decimal::ZERO) {
            Ordering::Greater => Movement::Inbound {
                quantity: self.quantity,
                amount: self.amount,
            },
            Ordering::Less => Movement::Outbound {
                quantity: self.quantity.abs(),
            },
            Ordering::Equal => Movement::Inert,
        }
    }

    /// The signed monetary movement of an account.
    #[must_use]
    pub const fn account_delta(&self) -> Decimal {
        self.quantity
    }

    /// Voucher label for ledger rows, falling back to `TXN-{seq}`.
    #[must_use]
    pub fn voucher_label(&self, seq: usize) -> String {
        let voucher = self.voucher_no.trim();
        if voucher.is_empty() {
            format!("TXN-{seq}")
        } else {
            voucher.to_string()
        }
    }

    /// Free-text description carried into ledger rows.
    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "Voucher Type: {}, RecType: {}",
            self.voucher_type, self.rec_type
        )
    }
}

/// How a transaction moves a weighted-average position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Units received at the recorded amount.
    Inbound {
        /// Units received (positive).
        quantity: Decimal,
        /// Recorded value of the receipt.
        amount: Decimal,
    },
    /// Units issued at the running average rate.
    Outbound {
        /// Units issued (positive).
        quantity: Decimal,
    },
    /// Zero quantity; consumes a row without changing the position.
    Inert,
}

impl Movement {
    /// Units received by this movement.
    #[must_use]
    pub const fn quantity_in(&self) -> Decimal {
        match self {
            Self::Inbound { quantity, .. } => *quantity,
            Self::Outbound { .. } | Self::Inert => Decimal::ZERO,
        }
    }

    /// Units issued by this movement.
    #[must_use]
    pub const fn quantity_out(&self) -> Decimal {
        match self {
            Self::Outbound { quantity } => *quantity,
            Self::Inbound { .. } | Self::Inert => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_movement_classification() {
        let inbound = Transaction::new(1, date(2024, 1, 1), dec!(5)).with_amount(dec!(50));
        assert_eq!(
            inbound.movement(),
            Movement::Inbound {
                quantity: dec!(5),
                amount: dec!(50)
            }
        );

        let outbound = Transaction::new(1, date(2024, 1, 2), dec!(-3)).with_amount(dec!(-999));
        assert_eq!(
            outbound.movement(),
            Movement::Outbound { quantity: dec!(3) }
        );

        let inert = Transaction::new(1, date(2024, 1, 3), dec!(0)).with_amount(dec!(10));
        assert_eq!(inert.movement(), Movement::Inert);
    }

    #[test]
    fn test_quantity_split() {
        let m = Movement::Outbound { quantity: dec!(7) };
        assert_eq!(m.quantity_in(), dec!(0));
        assert_eq!(m.quantity_out(), dec!(7));

        let m = Movement::Inbound {
            quantity: dec!(2),
            amount: dec!(1),
        };
        assert_eq!(m.quantity_in(), dec!(2));
        assert_eq!(m.quantity_out(), dec!(0));
    }

    #[test]
    fn test_voucher_label_fallback() {
        let txn = Transaction::new(1, date(2024, 1, 1), dec!(1));
        assert_eq!(txn.voucher_label(4), "TXN-4");

        let txn = txn.with_voucher(" VCH001 ");
        assert_eq!(txn.voucher_label(4), "VCH001");
    }

    #[test]
    fn test_description() {
        let txn = Transaction::new(1, date(2024, 1, 1), dec!(1))
            .with_voucher_type(2)
            .with_rec_type(1);
        assert_eq!(txn.description(), "Voucher Type: 2, RecType: 1");
    }

    #[test]
    fn test_sort_is_stable_within_a_date() {
        let mut txns = vec![
            Transaction::new(1, date(2024, 2, 1), dec!(1)).with_voucher("B"),
            Transaction::new(1, date(2024, 1, 1), dec!(1)).with_voucher("A"),
            Transaction::new(1, date(2024, 2, 1), dec!(1)).with_voucher("C"),
        ];
        sort_transactions(&mut txns);

        let order: Vec<_> = txns.iter().map(|t| t.voucher_no.as_str()).collect();
        assert_eq!(order, ["A", "B", "C"]);
    }
}
