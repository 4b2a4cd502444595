//! The data source seam.
//!
//! Reports never read storage directly. They ask a [`TransactionFeed`] for
//! items, opening positions and ordered transactions, and hand those to the
//! valuation engine. The local store and the live source both implement it.

use thiserror::Error;

use crate::{Item, ItemKind, OpeningPosition, Transaction};

/// Errors that can occur while reading a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// No master with this code and kind exists.
    #[error("no {kind} with code {code}")]
    UnknownItem {
        /// The requested code.
        code: i64,
        /// The requested kind.
        kind: ItemKind,
    },
}

/// A provider of items, openings and ordered transactions.
///
/// Implementations must return transactions already sorted in replay order
/// (date ascending, then a stable secondary key). The engine never sorts.
pub trait TransactionFeed: Send + Sync {
    /// Returns a short name of this feed for logs and report headers.
    fn name(&self) -> &str;

    /// All items of the given kind, ordered by name.
    fn items(&self, kind: ItemKind) -> Result<Vec<Item>, FeedError>;

    /// Look up a single item.
    fn item(&self, code: i64, kind: ItemKind) -> Result<Option<Item>, FeedError> {
        Ok(self.items(kind)?.into_iter().find(|item| item.code == code))
    }

    /// The opening position of an item. Missing rows read as zero.
    fn opening(&self, code: i64, kind: ItemKind) -> Result<OpeningPosition, FeedError>;

    /// Transactions of an item in replay order.
    fn transactions(&self, code: i64) -> Result<Vec<Transaction>, FeedError>;
}
