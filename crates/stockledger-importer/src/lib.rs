//! Import path for stockledger
//!
//! This crate reads the source system's CSV export and turns it into data the
//! valuation engine can use, in two ways:
//!
//! - [`LocalStore`] keeps an imported snapshot on disk and merges each new
//!   export into it (masters and openings replaced, transactions upserted by
//!   record type).
//! - [`LiveSource`] parses the export on every connection and serves it
//!   directly, without persisting anything.
//!
//! Both implement [`TransactionFeed`](stockledger_core::TransactionFeed).
//!
//! # Example
//!
//! ```rust,no_run
//! use stockledger_importer::{ExportConfig, ExportReader, LocalStore};
//!
//! let config = ExportConfig::builder("/srv/export")
//!     .delimiter(';')
//!     .build()?;
//!
//! let export = ExportReader::new(config).read()?;
//! let mut store = LocalStore::open("stock.json")?;
//! let summary = store.import(export);
//! store.save("stock.json")?;
//! println!("{summary}");
//! # Ok::<(), stockledger_importer::ImportError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod csv_importer;
pub mod date;
pub mod live;
pub mod store;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use config::{ExportConfig, ExportConfigBuilder};
pub use csv_importer::{Export, ExportReader, FolioRow};
pub use date::parse_date;
pub use live::LiveSource;
pub use store::LocalStore;

/// Errors that abort an import or a store operation.
///
/// Problems with individual rows are never errors; they are collected as
/// warnings in [`Export`] and [`ImportSummary`].
#[derive(Debug, Error)]
pub enum ImportError {
    /// IO error reading or writing a file.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The path involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed before any row could be read.
    #[error("failed to read CSV from {path}: {source}")]
    Csv {
        /// The offending table.
        path: PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A required column is missing from a table header.
    #[error("column '{column}' not found in {path}")]
    MissingColumn {
        /// The offending table.
        path: PathBuf,
        /// The missing column.
        column: String,
    },

    /// The configured delimiter cannot be used by the CSV reader.
    #[error("delimiter '{delimiter}' is not a single-byte ASCII character")]
    InvalidDelimiter {
        /// The configured delimiter.
        delimiter: char,
    },

        /// The store snapshot could not be encoded or decoded.
    #[error("invalid store snapshot {path}: {source}")]
    Snapshot {
        /// The snapshot file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of merging an export into the local store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Masters in the store after the import.
    pub masters: usize,
    /// Opening rows in the store after the import.
    pub openings: usize,
    /// Transactions created.
    pub created: usize,
    /// Transactions updated because a newer record type arrived.
    pub updated: usize,
    /// Transactions skipped because the stored record was as recent.
    pub skipped: usize,
    /// Stored transactions dropped because their master disappeared.
    pub removed: usize,
    /// Rows rejected while parsing or merging.
    pub errors: usize,
    /// One message per rejected row.
    pub warnings: Vec<String>,
}

impl ImportSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the summary.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Record a rejected row.
    pub(crate) fn reject(&mut self, warning: String) {
        tracing::debug!("{warning}");
        self.errors += 1;
        self.warnings.push(warning);
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} masters, {} openings; transactions: {} created, {} updated, {} skipped, {} removed",
            self.masters, self.openings, self.created, self.updated, self.skipped, self.removed
        )?;
        if self.errors > 0 {
            write!(f, "; {} rows had errors", self.errors)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = ImportSummary {
            masters: 3,
            openings: 2,
            created: 5,
            updated: 1,
            skipped: 4,
            ..ImportSummary::new()
        };
        assert_eq!(
            summary.to_string(),
            "3 masters, 2 openings; transactions: 5 created, 1 updated, 4 skipped, 0 removed"
        );
    }

    #[test]
    fn test_summary_display_with_errors() {
        let mut summary = ImportSummary::new();
        summary.reject("tran2.csv row 1: bad".to_string());
        assert!(summary.to_string().ends_with("; 1 rows had errors"));
        assert_eq!(summary.warnings, vec!["tran2.csv row 1: bad"]);
    }

    #[test]
    fn test_summary_with_warning() {
        let summary = ImportSummary::new()
            .with_warning("Warning 1")
            .with_warning("Warning 2");
        assert_eq!(summary.warnings.len(), 2);
        assert_eq!(summary.errors, 0);
    }

    #[test]
    fn test_error_messages() {
        let err = ImportError::MissingColumn {
            path: PathBuf::from("master1.csv"),
            column: "Code".to_string(),
        };
        assert_eq!(err.to_string(), "column 'Code' not found in master1.csv");
    }
}
