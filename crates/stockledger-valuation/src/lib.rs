//! Weighted-average-cost valuation.
//!
//! This crate provides:
//! - Stock valuation over a date window ([`compute_valuation`])
//! - Running-balance stock ledgers ([`build_ledger`])
//! - Signed-sum account balances ([`compute_balance`])
//!
//! Every function here is pure: it takes an opening position and a slice of
//! transactions already in replay order and returns fresh records. Nothing is
//! cached between calls.
//!
//! # Weighted average cost
//!
//! Receipts add their recorded amount to the running value. Issues remove
//! `units * (value / quantity)` at the rate current when they are processed;
//! the amount recorded on an issue row is ignored.
//!
//! ```
//! use stockledger_core::{DateWindow, NaiveDate, OpeningPosition, Transaction};
//! use stockledger_valuation::compute_valuation;
//! use rust_decimal_macros::dec;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let txns = vec![
//!     Transaction::new(1, day(10), dec!(50)).with_amount(dec!(500)),
//!     Transaction::new(1, day(20), dec!(-20)).with_amount(dec!(-999)),
//! ];
//!
//! let valuation = compute_valuation(
//!     &OpeningPosition::new(dec!(100), dec!(1000)),
//!     &txns,
//!     &DateWindow::unbounded(),
//! );
//! assert_eq!(valuation.closing_quantity, dec!(130));
//! assert_eq!(valuation.closing_value, dec!(1300));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod balance;
mod ledger;
mod stock;
mod wac;

pub use balance::compute_balance;
pub use ledger::{build_ledger, LedgerRows};
pub use stock::compute_valuation;
pub use wac::{rebase, PositionChange, RunningPosition};
