//! Persistent local store of imported data.
//!
//! The store is a JSON snapshot of masters, openings and transactions. Each
//! import merges a fresh [`Export`] into it:
//!
//! 1. masters are replaced wholesale, and stored transactions whose master
//!    is gone are dropped;
//! 2. transactions are matched on (master code, voucher number, date)
//!    against what earlier imports stored. An unmatched row is created, even
//!    when another row of the same export shares its key. A matched row is
//!    updated only when the incoming record type is strictly greater, and
//!    skipped otherwise;
//! 3. openings are replaced wholesale.
//!
//! Every stored transaction carries an insertion sequence number that breaks
//! same-date ties when the store serves transactions to the engine.

use crate::csv_importer::Export;
use crate::{ImportError, ImportSummary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use stockledger_core::{
    FeedError, Item, ItemKind, OpeningPosition, Transaction, TransactionFeed,
};

/// Snapshot format version written by this crate.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredTransaction {
    seq: u64,
    #[serde(flatten)]
    txn: Transaction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredOpening {
    code: i64,
    kind: ItemKind,
    #[serde(flatten)]
    position: OpeningPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    next_seq: u64,
    masters: Vec<Item>,
    openings: Vec<StoredOpening>,
    transactions: Vec<StoredTransaction>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            next_seq: 1,
            masters: Vec::new(),
            openings: Vec::new(),
            transactions: Vec::new(),
        }
    }
}

type TransactionKey = (i64, String, NaiveDate);

fn key_of(txn: &Transaction) -> TransactionKey {
    (txn.code, txn.voucher_no.trim().to_string(), txn.date)
}

/// The local store.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    snapshot: Snapshot,
}

impl LocalStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store snapshot. A missing file opens an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no store snapshot yet, starting empty");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(ImportError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|source| ImportError::Snapshot {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(
            path = %path.display(),
            masters = snapshot.masters.len(),
            transactions = snapshot.transactions.len(),
            "opened store"
        );
        Ok(Self { snapshot })
    }

    /// Write the store to `path`.
    ///
    /// The snapshot is written to a temporary file next to the target and
    /// renamed over it, so readers never see a partial file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ImportError> {
        let path = path.as_ref();
        let io_err = |source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json =
            serde_json::to_vec_pretty(&self.snapshot).map_err(|source| ImportError::Snapshot {
                path: path.to_path_buf(),
                source,
            })?;

        let tmp = temp_path(path);
        let mut file = fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(&json).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);
        fs::rename(&tmp, path).map_err(io_err)?;

        tracing::debug!(path = %path.display(), bytes = json.len(), "saved store");
        Ok(())
    }

    /// Merge an export into the store.
    pub fn import(&mut self, export: Export) -> ImportSummary {
        let Export {
            masters,
            transactions,
            folios,
            rejected,
            warnings,
        } = export;

        let mut summary = ImportSummary {
            errors: rejected,
            warnings,
            ..ImportSummary::new()
        };

        // Step 1: masters
        let previous = self.snapshot.masters.len();
        self.snapshot.masters = masters;
        summary.masters = self.snapshot.masters.len();
        tracing::info!(previous, imported = summary.masters, "replaced masters");

        let known: HashSet<i64> = self.snapshot.masters.iter().map(|m| m.code).collect();
        let before = self.snapshot.transactions.len();
        self.snapshot
            .transactions
            .retain(|stored| known.contains(&stored.txn.code));
        summary.removed = before - self.snapshot.transactions.len();
        if summary.removed > 0 {
            tracing::info!(removed = summary.removed, "dropped transactions of removed masters");
        }

        // Step 2: transactions. Only rows stored by earlier imports take part
        // in the upsert; every row of this export is kept.
        let index: HashMap<TransactionKey, usize> = self
            .snapshot
            .transactions
            .iter()
            .enumerate()
            .map(|(i, stored)| (key_of(&stored.txn), i))
            .collect();

        for mut txn in transactions {
            if !known.contains(&txn.code) {
                summary.reject(format!(
                    "skipped transaction with non-existent master code {} for voucher '{}'",
                    txn.code, txn.voucher_no
                ));
                continue;
            }

            txn.voucher_no = txn.voucher_no.trim().to_string();
            let key = key_of(&txn);
            match index.get(&key) {
                Some(&i) => {
                    let stored = &mut self.snapshot.transactions[i].txn;
                    if txn.rec_type > stored.rec_type {
                        stored.voucher_type = txn.voucher_type;
                        stored.rec_type = txn.rec_type;
                        stored.quantity = txn.quantity;
                        stored.amount = txn.amount;
                        summary.updated += 1;
                    } else {
                        summary.skipped += 1;
                    }
                }
                None => {
                    let seq = self.snapshot.next_seq;
                    self.snapshot.next_seq += 1;
                    self.snapshot
                        .transactions
                        .push(StoredTransaction { seq, txn });
                    summary.created += 1;
                }
            }
        }
        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            "merged transactions"
        );

        // Step 3: openings
        let mut openings = Vec::with_capacity(folios.len());
        for folio in folios {
            if known.contains(&folio.code) {
                openings.push(StoredOpening {
                    code: folio.code,
                    kind: folio.kind,
                    position: folio.position,
                });
            } else {
                summary.reject(format!(
                    "skipped opening with non-existent master code {}",
                    folio.code
                ));
            }
        }
        self.snapshot.openings = openings;
        summary.openings = self.snapshot.openings.len();
        tracing::info!(imported = summary.openings, "replaced openings");

        summary
    }

    /// Number of stored masters.
    pub fn master_count(&self) -> usize {
        self.snapshot.masters.len()
    }

    /// Number of stored transactions.
    pub fn transaction_count(&self) -> usize {
        self.snapshot.transactions.len()
    }

    /// Check if nothing has been imported yet.
    pub fn is_empty(&self) -> bool {
        self.snapshot.masters.is_empty()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

impl TransactionFeed for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    fn items(&self, kind: ItemKind) -> Result<Vec<Item>, FeedError> {
        let mut items: Vec<Item> = self
            .snapshot
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
            .snapshot
            .openings
            .iter()
            .find(|o| o.code == code && o.kind == kind)
            .map_or_else(OpeningPosition::zero, |o| o.position))
    }

    fn transactions(&self, code: i64) -> Result<Vec<Transaction>, FeedError> {
        let mut stored: Vec<&StoredTransaction> = self
            .snapshot
            .transactions
            .iter()
            .filter(|s| s.txn.code == code)
            .collect();
        stored.sort_by_key(|s| (s.txn.date, s.seq));
        Ok(stored.into_iter().map(|s| s.txn.clone()).collect())
    }
}
