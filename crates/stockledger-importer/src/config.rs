//! Location and layout of a source export.

use crate::ImportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name of the master table.
pub const MASTER_FILE: &str = "master1.csv";
/// Default file name of the transaction table.
pub const TRANSACTION_FILE: &str = "tran2.csv";
/// Default file name of the opening table.
pub const FOLIO_FILE: &str = "folio1.csv";

/// Where a source export lives and how its tables are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory holding the three tables.
    pub export_dir: PathBuf,
    /// Master table file name.
    #[serde(default = "default_master_file")]
    pub master_file: String,
    /// Transaction table file name.
    #[serde(default = "default_transaction_file")]
    pub transaction_file: String,
    /// Opening table file name.
    #[serde(default = "default_folio_file")]
    pub folio_file: String,
    /// The field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Whether each table starts with a header row.
    ///
    /// Without a header, columns are read positionally in the documented
    /// order.
    #[serde(default = "default_has_header")]
    pub has_header: bool,
}

fn default_master_file() -> String {
    MASTER_FILE.to_string()
}

fn default_transaction_file() -> String {
    TRANSACTION_FILE.to_string()
}

fn default_folio_file() -> String {
    FOLIO_FILE.to_string()
}

const fn default_delimiter() -> char {
    ','
}

const fn default_has_header() -> bool {
    true
}

impl ExportConfig {
    /// Default layout for an export directory.
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            master_file: default_master_file(),
            transaction_file: default_transaction_file(),
            folio_file: default_folio_file(),
            delimiter: default_delimiter(),
            has_header: default_has_header(),
        }
    }

    /// Start building a configuration for an export directory.
    pub fn builder(export_dir: impl Into<PathBuf>) -> ExportConfigBuilder {
        ExportConfigBuilder::new(export_dir)
    }

    /// Path of the master table.
    pub fn master_path(&self) -> PathBuf {
        self.export_dir.join(&self.master_file)
    }

    /// Path of the transaction table.
    pub fn transaction_path(&self) -> PathBuf {
        self.export_dir.join(&self.transaction_file)
    }

    /// Path of the opening table.
    pub fn folio_path(&self) -> PathBuf {
        self.export_dir.join(&self.folio_file)
    }

    /// The export directory.
    pub fn dir(&self) -> &Path {
        &self.export_dir
    }

    /// The delimiter as the single byte the CSV reader needs.
    pub fn delimiter_byte(&self) -> Result<u8, ImportError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(ImportError::InvalidDelimiter {
                delimiter: self.delimiter,
            })
    }
}

/// Builder for [`ExportConfig`].
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    /// Create a new builder with the default layout.
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: ExportConfig::new(export_dir),
        }
    }

    /// Set the master table file name.
    pub fn master_file(mut self, name: impl Into<String>) -> Self {
        self.config.master_file = name.into();
        self
    }

    /// Set the transaction table file name.
    pub fn transaction_file(mut self, name: impl Into<String>) -> Self {
        self.config.transaction_file = name.into();
        self
    }

    /// Set the opening table file name.
    pub fn folio_file(mut self, name: impl Into<String>) -> Self {
        self.config.folio_file = name.into();
        self
    }

    /// Set the field delimiter.
    pub const fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Set whether the tables have a header row.
    pub const fn has_header(mut self, has_header: bool) -> Self {
        self.config.has_header = has_header;
        self
    }

    /// Build the configuration.
    ///
    /// Fails if the delimiter is not an ASCII character.
    pub fn build(self) -> Result<ExportConfig, ImportError> {
        self.config.delimiter_byte()?;
        Ok(self.config)
    }
}
