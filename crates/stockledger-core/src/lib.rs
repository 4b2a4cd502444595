//! Core types for stockledger
//!
//! This crate provides the fundamental types shared by the valuation engine,
//! the importer and the report tools:
//!
//! - [`Item`] and [`ItemKind`] - Master records (inventory items and accounts)
//! - [`OpeningPosition`] - Opening quantity and value of an item
//! - [`Transaction`] and [`Movement`] - Dated stock/account movements
//! - [`DateWindow`] - Optional inclusive reporting window
//! - [`Valuation`], [`LedgerRow`], [`BalanceSummary`] - Engine output records
//! - [`TransactionFeed`] - The seam between data sources and reports
//!
//! # Example
//!
//! ```
//! use stockledger_core::{Movement, NaiveDate, Transaction};
//! use rust_decimal_macros::dec;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let purchase = Transaction::new(1001, date, dec!(50)).with_amount(dec!(500));
//!
//! assert_eq!(
//!     purchase.movement(),
//!     Movement::Inbound { quantity: dec!(50), amount: dec!(500) }
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod feed;
pub mod item;
pub mod position;
pub mod record;
pub mod transaction;
pub mod window;

pub use feed::{FeedError, TransactionFeed};
pub use item::{Item, ItemKind};
pub use position::OpeningPosition;
pub use record::{
    round2, BalanceResult, BalanceSummary, LedgerRow, Valuation, ValuationResult,
    OPENING_BALANCE_LABEL,
};
pub use transaction::{sort_transactions, Movement, Transaction};
pub use window::DateWindow;

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
