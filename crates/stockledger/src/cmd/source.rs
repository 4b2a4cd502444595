//! Data source selection shared by the commands.

use crate::config::Settings;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use stockledger_core::TransactionFeed;
use stockledger_importer::{LiveSource, LocalStore};

/// Which feed a report reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SourceKind {
    /// The imported local store.
    #[default]
    Local,
    /// The configured export, read on the spot.
    Live,
}

/// Flags locating settings, store and user.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Settings file (default: the user config directory)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Local store snapshot (default: from settings, then the user data directory)
    #[arg(long, value_name = "FILE", global = true)]
    pub store: Option<PathBuf>,

    /// User whose source settings apply
    #[arg(long, global = true)]
    pub user: Option<String>,
}

impl SourceArgs {
    /// Load the settings these flags point at.
    pub fn settings(&self) -> Result<Settings> {
        Ok(Settings::load_or_default(self.config.as_deref())?)
    }

    /// The store path: the flag, then settings, then the default location.
    pub fn store_path(&self, settings: &Settings) -> Result<PathBuf> {
        self.store
            .clone()
            .or_else(|| settings.store_path())
            .context("no store location: pass --store or set \"store\" in the settings file")
    }
}

/// Open the feed a report should read.
///
/// A live source that cannot be resolved or read falls back to the local
/// store with a warning.
pub fn open_feed(kind: SourceKind, args: &SourceArgs) -> Result<Box<dyn TransactionFeed>> {
    let settings = args.settings()?;

    if kind == SourceKind::Live {
        let live = settings
            .resolve(args.user.as_deref())
            .map_err(anyhow::Error::from)
            .and_then(|export| LiveSource::connect(export.clone()).map_err(anyhow::Error::from));
        match live {
            Ok(source) => {
                for warning in source.warnings() {
                    tracing::warn!("{warning}");
                }
                return Ok(Box::new(source));
            }
            Err(e) => {
                tracing::warn!("live source unavailable, using local store: {e:#}");
            }
        }
    }

    let path = args.store_path(&settings)?;
    let store = LocalStore::open(&path)
        .with_context(|| format!("failed to open store {}", path.display()))?;
    if store.is_empty() {
        tracing::warn!(path = %path.display(), "local store is empty; run stock-import first");
    }
    Ok(Box::new(store))
}
