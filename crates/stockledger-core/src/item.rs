//! Master records.
//!
//! Every row in the source system's master table is an [`Item`]. The master
//! type decides how the item is valued: inventory items go through the
//! weighted-average-cost engine, accounts through signed-sum aggregation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of master record, keyed by the source system's master type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ItemKind {
    /// Ledger account, valued by signed sum (master type 2).
    Account,
    /// Stock item, valued by weighted average cost (master type 6).
    Inventory,
    /// Any other master record. Imported, never reported.
    Other(i32),
}

impl ItemKind {
    /// Master type code of accounts.
    pub const ACCOUNT_CODE: i32 = 2;
    /// Master type code of inventory items.
    pub const INVENTORY_CODE: i32 = 6;
    /// Master type codes accepted by the importer.
    pub const IMPORTED_CODES: [i32; 3] = [2, 6, 9];

    /// Map a source master type code to a kind.
    #[must_use]
    pub const fn from_master_type(code: i32) -> Self {
        match code {
            Self::ACCOUNT_CODE => Self::Account,
            Self::INVENTORY_CODE => Self::Inventory,
            other => Self::Other(other),
        }
    }

    /// The source master type code.
    #[must_use]
    pub const fn master_type(self) -> i32 {
        match self {
            Self::Account => Self::ACCOUNT_CODE,
            Self::Inventory => Self::INVENTORY_CODE,
            Self::Other(code) => code,
        }
    }

    /// Whether the importer keeps records of this master type.
    #[must_use]
    pub fn is_imported(self) -> bool {
        Self::IMPORTED_CODES.contains(&self.master_type())
    }
}

impl From<i32> for ItemKind {
    fn from(code: i32) -> Self {
        Self::from_master_type(code)
    }
}

impl From<ItemKind> for i32 {
    fn from(kind: ItemKind) -> Self {
        kind.master_type()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account => write!(f, "account"),
            Self::Inventory => write!(f, "inventory item"),
            Self::Other(code) => write!(f, "master type {code}"),
        }
    }
}

impl FromStr for ItemKind {
    type Err = String;

    /// Parses `inventory`, `account` or a numeric master type code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inventory" | "item" => Ok(Self::Inventory),
            "account" => Ok(Self::Account),
            other => other
                .parse::<i32>()
                .map(Self::from_master_type)
                .map_err(|_| format!("unknown master type: {s}")),
        }
    }
}

/// A master record: an inventory item or an account.
///
/// `code` is assigned by the source system and is the key every other table
/// refers to. Items are immutable once imported and replaced wholesale by the
/// next import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Source-assigned master code.
    pub code: i64,
    /// Display name.
    pub name: String,
    /// Master type.
    pub kind: ItemKind,
}

impl Item {
    /// Create a new item.
    pub fn new(code: i64, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            code,
            name: name.into(),
            kind,
        }
    }

    /// Create an inventory item.
    pub fn inventory(code: i64, name: impl Into<String>) -> Self {
        Self::new(code, name, ItemKind::Inventory)
    }

    /// Create an account.
    pub fn account(code: i64, name: impl Into<String>) -> Self {
        Self::new(code, name, ItemKind::Account)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}
