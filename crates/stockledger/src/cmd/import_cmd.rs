//! stock-import - Merge a source export into the local store.
//!
//! # Usage
//!
//! ```bash
//! stock-import                      # export resolved from settings
//! stock-import /srv/export --store stock.json
//! stock-import /srv/export --delimiter ';' --no-header
//! ```

use crate::cmd::source::SourceArgs;
use crate::logging;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stockledger_importer::{ExportConfig, ExportReader, ImportSummary, LocalStore};

/// Import a source export into the local store.
#[derive(Parser, Debug)]
#[command(name = "stock-import")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Export directory (default: the active source from settings)
    #[arg(value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// CSV delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Export tables have no header row
    #[arg(long)]
    no_header: bool,

    #[command(flatten)]
    sources: SourceArgs,

    /// Don't list rejected rows
    #[arg(short, long)]
    quiet: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point for the import command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let settings = args.sources.settings()?;

    let mut export = match &args.export_dir {
        Some(dir) => ExportConfig::new(dir),
        None => settings
            .resolve(args.sources.user.as_deref())
            .context("no export directory given")?
            .clone(),
    };
    if let Some(delimiter) = args.delimiter {
        export.delimiter = delimiter;
    }
    if args.no_header {
        export.has_header = false;
    }
    export.delimiter_byte()?;

    let store_path = args.sources.store_path(&settings)?;
    let summary = import_into_store(export, &store_path)?;

    if !args.quiet {
        for warning in &summary.warnings {
            eprintln!("warning: {warning}");
        }
    }
    println!("Imported into {}: {summary}", store_path.display());

    Ok(())
}

/// Read an export and merge it into the store at `store_path`.
pub fn import_into_store(export: ExportConfig, store_path: &Path) -> Result<ImportSummary> {
    let dir = export.export_dir.clone();
    let export = ExportReader::new(export)
        .read()
        .with_context(|| format!("failed to read export {}", dir.display()))?;

    let mut store = LocalStore::open(store_path)
        .with_context(|| format!("failed to open store {}", store_path.display()))?;
    let summary = store.import(export);
    store
        .save(store_path)
        .with_context(|| format!("failed to save store {}", store_path.display()))?;

    tracing::info!(store = %store_path.display(), "{summary}");
    Ok(summary)
}
