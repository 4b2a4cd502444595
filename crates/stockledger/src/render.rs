//! Report output: text tables, CSV and JSON.

use crate::reports::{ClosingBalance, ClosingStock, StockLedger};
use anyhow::Result;
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use stockledger_core::DateWindow;

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table.
    #[default]
    Text,
    /// Comma-separated values with a header row.
    Csv,
    /// Pretty-printed JSON.
    Json,
}

const STOCK_HEADERS: [&str; 8] = [
    "Code",
    "Name",
    "Opening Qty",
    "Opening Value",
    "Period Qty",
    "Period Value",
    "Closing Qty",
    "Closing Value",
];

const BALANCE_HEADERS: [&str; 5] = ["Code", "Name", "Opening", "Period", "Closing"];

const LEDGER_HEADERS: [&str; 10] = [
    "#",
    "Date",
    "Voucher",
    "Opening Qty",
    "Opening Value",
    "In",
    "Out",
    "Closing Qty",
    "Closing Value",
    "Description",
];

fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

fn period_label(window: &DateWindow) -> String {
    match (window.start, window.end) {
        (None, None) => "all dates".to_string(),
        (Some(start), None) => format!("from {start}"),
        (None, Some(end)) => format!("up to {end}"),
        (Some(start), Some(end)) => format!("{start} to {end}"),
    }
}

/// Write the closing stock report.
pub fn closing_stock<W: Write>(report: &ClosingStock, format: OutputFormat, writer: &mut W) -> Result<()> {
    let rows: Vec<Vec<String>> = report
        .items
        .iter()
        .map(|r| {
            let v = &r.valuation;
            vec![
                r.code.to_string(),
                r.name.clone(),
                money(v.opening_quantity),
                money(v.opening_value),
                money(v.period_quantity),
                money(v.period_value),
                money(v.closing_quantity),
                money(v.closing_value),
            ]
        })
        .collect();

    match format {
        OutputFormat::Json => json(report, writer),
        OutputFormat::Csv => csv_table(&STOCK_HEADERS, &rows, writer),
        OutputFormat::Text => {
            writeln!(writer, "Closing Stock")?;
            writeln!(
                writer,
                "Period: {}   Source: {}",
                period_label(&report.window),
                report.source
            )?;
            writeln!(writer)?;
            text_table(&STOCK_HEADERS, &rows, &[1], writer)?;
            writeln!(writer)?;

            let s = &report.summary;
            writeln!(
                writer,
                "Items: {} ({} with stock, {} at zero)",
                s.total_items, s.non_zero_items, s.zero_quantity_items
            )?;
            writeln!(
                writer,
                "Total opening value: {}   Total closing value: {}",
                money(s.opening_value),
                money(s.closing_value)
            )?;
            if s.total_items == 0 && report.hide_zero_balance {
                writeln!(writer, "No items with a non-zero closing quantity.")?;
            }
            Ok(())
        }
    }
}

/// Write the closing balance report.
pub fn closing_balance<W: Write>(
    report: &ClosingBalance,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    let rows: Vec<Vec<String>> = report
        .accounts
        .iter()
        .map(|r| {
            vec![
                r.code.to_string(),
                r.name.clone(),
                money(r.summary.opening_balance),
                money(r.summary.period_amount),
                money(r.summary.closing_balance),
            ]
        })
        .collect();

    match format {
        OutputFormat::Json => json(report, writer),
        OutputFormat::Csv => csv_table(&BALANCE_HEADERS, &rows, writer),
        OutputFormat::Text => {
            writeln!(writer, "Closing Balance")?;
            writeln!(
                writer,
                "Period: {}   Source: {}",
                period_label(&report.window),
                report.source
            )?;
            writeln!(writer)?;
            text_table(&BALANCE_HEADERS, &rows, &[1], writer)?;
            writeln!(writer)?;
            writeln!(writer, "Accounts: {}", report.accounts.len())?;
            Ok(())
        }
    }
}

/// Write a stock ledger.
pub fn stock_ledger<W: Write>(report: &StockLedger, format: OutputFormat, writer: &mut W) -> Result<()> {
    let rows: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|r| {
            vec![
                r.seq.to_string(),
                r.date.map(|d| d.to_string()).unwrap_or_default(),
                r.voucher.clone(),
                money(r.opening_quantity),
                money(r.opening_value),
                money(r.quantity_in),
                money(r.quantity_out),
                money(r.closing_quantity),
                money(r.closing_value),
                r.description.clone(),
            ]
        })
        .collect();

    match format {
        OutputFormat::Json => json(report, writer),
        OutputFormat::Csv => csv_table(&LEDGER_HEADERS, &rows, writer),
        OutputFormat::Text => {
            writeln!(writer, "Stock Ledger: {}", report.item)?;
            writeln!(
                writer,
                "Period: {}   Source: {}",
                period_label(&report.window),
                report.source
            )?;
            writeln!(writer)?;
            text_table(&LEDGER_HEADERS, &rows, &[1, 2, 9], writer)?;
            Ok(())
        }
    }
}

fn json<T: Serialize, W: Write>(report: &T, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

fn csv_table<W: Write>(headers: &[&str], rows: &[Vec<String>], writer: &mut W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(headers)?;
    for row in rows {
        csv.write_record(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write an aligned table. Columns listed in `left` are left-aligned, the
/// rest right-aligned.
fn text_table<W: Write>(
    headers: &[&str],
    rows: &[Vec<String>],
    left: &[usize],
    writer: &mut W,
) -> Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    writeln!(writer, "{}", table_line(headers.iter().copied(), &widths, left))?;
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    writeln!(writer, "{}", "-".repeat(total))?;
    for row in rows {
        writeln!(writer, "{}", table_line(row.iter().map(String::as_str), &widths, left))?;
    }
    Ok(())
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize], left: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            if left.contains(&i) {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}
