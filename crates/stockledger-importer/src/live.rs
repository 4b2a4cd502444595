//! Live source: reads the export directly on every connection.

use crate::config::ExportConfig;
use crate::csv_importer::{Export, ExportReader};
use crate::ImportError;
use stockledger_core::{FeedError, Item, ItemKind, OpeningPosition, Transaction, TransactionFeed};

/// A feed over a freshly read export.
///
/// Nothing is persisted and no record-type merging happens: every row of the
/// export is served as-is. Transactions come back ordered by date, then by
/// record type.
#[derive(Debug, Clone)]
pub struct LiveSource {
    config: ExportConfig,
    export: Export,
}

impl LiveSource {
    /// Read the export described by `config`.
    pub fn connect(config: ExportConfig) -> Result<Self, ImportError> {
        tracing::debug!(dir = %config.export_dir.display(), "connecting to live source");
        let export = ExportReader::new(config.clone()).read()?;
        Ok(Self { config, export })
    }

    /// Wrap an already parsed export.
    pub const fn from_export(config: ExportConfig, export: Export) -> Self {
        Self { config, export }
    }

    /// The export layout this source reads.
    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Warnings collected while reading the export.
    pub fn warnings(&self) -> &[String] {
        &self.export.warnings
    }
}

impl TransactionFeed for LiveSource {
    fn name(&self) -> &str {
        "live"
    }

    fn items(&self, kind: ItemKind) -> Result<Vec<Item>, FeedError> {
        let mut items: Vec<Item> = self
            .export
            .masters
            .iter()
            .filter(|m| m.kind == kind)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then(a.code.cmp(&b.code)));
        Ok(items)
    }

    fn opening(&self, code: i64, kind: ItemKind) -> Result<OpeningPosition, FeedError> {
        Ok(self
            .export
            .folios
            .iter()
            .find(|f| f.code == code && f.kind == kind)
            .map_or_else(OpeningPosition::zero, |f| f.position))
    }

    fn transactions(&self, code: i64) -> Result<Vec<Transaction>, FeedError> {
        let mut txns: Vec<Transaction> = self
            .export
            .transactions
            .iter()
            .filter(|t| t.code == code)
            .cloned()
            .collect();
        txns.sort_by_key(|t| (t.date, t.rec_type));
        Ok(txns)
    }
}
