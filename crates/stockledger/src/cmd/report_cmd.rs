//! stock-report - Closing stock, closing balance and stock ledger reports.
//!
//! # Usage
//!
//! ```bash
//! stock-report stock --start 2024-04-01 --end 2025-03-31 --hide-zero
//! stock-report balance --end 2025-03-31 --format csv --output balances.csv
//! stock-report ledger 1001 --source live --user alice
//! ```
//!
//! # Reports
//!
//! - `stock` - Weighted-average valuation of every inventory item
//! - `balance` - Opening, period and closing balance of every account
//! - `ledger CODE` - Running-balance ledger of one inventory item

use crate::cmd::source::{open_feed, SourceArgs, SourceKind};
use crate::render::{self, OutputFormat};
use crate::{logging, reports};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use stockledger_core::{DateWindow, TransactionFeed};

/// Generate stock and balance reports.
#[derive(Parser, Debug)]
#[command(name = "stock-report")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The report to generate
    #[command(subcommand)]
    report: Report,

    /// First day of the period, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", global = true)]
    start: Option<NaiveDate>,

    /// Last day of the period, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", global = true)]
    end: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,

    /// Data source to report from
    #[arg(long, value_enum, default_value_t = SourceKind::Local, global = true)]
    source: SourceKind,

    #[command(flatten)]
    sources: SourceArgs,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// A report request.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Closing stock of every inventory item
    Stock {
        /// Leave out items whose closing quantity is zero
        #[arg(long)]
        hide_zero: bool,
    },
    /// Closing balance of every account
    Balance,
    /// Running-balance ledger of one inventory item
    Ledger {
        /// Item code
        #[arg(value_name = "CODE")]
        code: i64,
    },
}

/// Main entry point for the report command.
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
    let window = DateWindow::new(args.start, args.end);
    if window.is_inverted() {
        tracing::warn!("--start is after --end; the period is empty");
    }

    let feed = open_feed(args.source, &args.sources)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_report(feed.as_ref(), &args.report, &window, args.format, &mut writer)?;
            writer.flush()?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            write_report(feed.as_ref(), &args.report, &window, args.format, &mut stdout)?;
        }
    }

    Ok(())
}

/// Build a report from `feed` and write it in `format`.
pub fn write_report<W: Write>(
    feed: &dyn TransactionFeed,
    report: &Report,
    window: &DateWindow,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    match report {
        Report::Stock { hide_zero } => {
            let report = reports::closing_stock(feed, window, *hide_zero)?;
            render::closing_stock(&report, format, writer)
        }
        Report::Balance => {
            let report = reports::closing_balance(feed, window)?;
            render::closing_balance(&report, format, writer)
        }
        Report::Ledger { code } => {
            let report = reports::stock_ledger(feed, *code, window)?;
            render::stock_ledger(&report, format, writer)
        }
    }
}
