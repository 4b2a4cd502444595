//! Stock valuation and balance reporting tools.
//!
//! This crate provides the command-line front end over the valuation engine:
//!
//! - `stock-report`: Closing stock, closing balance and stock ledger reports
//! - `stock-import`: Merge a source export into the local store
//!
//! # Example Usage
//!
//! ```bash
//! stock-import /srv/export
//! stock-report stock --end 2025-03-31 --hide-zero
//! stock-report ledger 1001 --start 2025-01-01 --format csv
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod config;
pub mod logging;
pub mod render;
pub mod reports;
