//! Settings file and source resolution.
//!
//! ```json
//! {
//!   "store": "/var/lib/stockledger/store.json",
//!   "default": { "export_dir": "/srv/export", "active": true },
//!   "users": {
//!     "alice": { "export_dir": "/home/alice/export", "delimiter": ";", "active": true }
//!   }
//! }
//! ```
//!
//! A user's own active source wins over the shared default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use stockledger_importer::ExportConfig;
use thiserror::Error;

const APP_DIR: &str = "stockledger";

/// Errors loading or resolving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings {path}: {source}")]
    Io {
        /// The settings file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for [`Settings`].
    #[error("invalid settings {path}: {source}")]
    Parse {
        /// The settings file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Neither the user nor the shared default has an active source.
    #[error("no active source configured{}", for_user(.user))]
    NoActiveSource {
        /// The user that was resolved, if any.
        user: Option<String>,
    },
}

fn for_user(user: &Option<String>) -> String {
    user.as_ref()
        .map(|u| format!(" for user '{u}'"))
        .unwrap_or_default()
}

/// A configured export source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Export location and layout.
    #[serde(flatten)]
    pub export: ExportConfig,
    /// Inactive sources are ignored during resolution.
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// Contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Location of the local store snapshot.
    #[serde(default)]
    pub store: Option<PathBuf>,
    /// Shared source used when a user has none of their own.
    #[serde(default)]
    pub default: Option<SourceSettings>,
    /// Per-user sources.
    #[serde(default)]
    pub users: BTreeMap<String, SourceSettings>,
}

impl Settings {
    /// Load settings from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings from `path`, or from the default location.
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields empty settings.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_settings_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading settings");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Pick the export source for `user`.
    ///
    /// The user's active source wins; otherwise the active shared default is
    /// used.
    pub fn resolve(&self, user: Option<&str>) -> Result<&ExportConfig, ConfigError> {
        let own = user
            .and_then(|u| self.users.get(u))
            .filter(|source| source.active);
        if let Some(source) = own {
            tracing::debug!(user = user.unwrap_or_default(), "using user source");
            return Ok(&source.export);
        }

        self.default
            .as_ref()
            .filter(|source| source.active)
            .map(|source| &source.export)
            .ok_or_else(|| ConfigError::NoActiveSource {
                user: user.map(str::to_string),
            })
    }

    /// The store location: the configured one, or the default data path.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store.clone().or_else(default_store_path)
    }
}

/// Default settings file location.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join("config.json"))
}

/// Default store snapshot location.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(APP_DIR).join("store.json"))
}
