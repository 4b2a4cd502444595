//! Report assembly.
//!
//! Each report reads items, openings and transactions from a
//! [`TransactionFeed`] and runs them through the valuation engine. Items are
//! independent of each other, so they are valued in parallel.

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use stockledger_core::{
    BalanceResult, DateWindow, FeedError, Item, ItemKind, LedgerRow, TransactionFeed,
    ValuationResult,
};
use stockledger_valuation::{build_ledger, compute_balance, compute_valuation};

/// Counts and totals shown under a closing stock report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StockSummary {
    /// Items listed.
    pub total_items: usize,
    /// Listed items with a zero closing quantity.
    pub zero_quantity_items: usize,
    /// Listed items with a non-zero closing quantity.
    pub non_zero_items: usize,
    /// Sum of opening values.
    pub opening_value: Decimal,
    /// Sum of closing values.
    pub closing_value: Decimal,
}

/// Closing stock of every inventory item.
#[derive(Debug, Clone, Serialize)]
pub struct ClosingStock {
    /// Name of the feed the report was built from.
    pub source: String,
    /// Reporting window.
    pub window: DateWindow,
    /// Whether zero-quantity items were dropped.
    pub hide_zero_balance: bool,
    /// One valuation per item, ordered by item name.
    pub items: Vec<ValuationResult>,
    /// Counts over `items`.
    pub summary: StockSummary,
}

/// Closing balance of every account with something to report.
#[derive(Debug, Clone, Serialize)]
pub struct ClosingBalance {
    /// Name of the feed the report was built from.
    pub source: String,
    /// Reporting window.
    pub window: DateWindow,
    /// One summary per reportable account, ordered by account name.
    pub accounts: Vec<BalanceResult>,
}

/// Running-balance ledger of one inventory item.
#[derive(Debug, Clone, Serialize)]
pub struct StockLedger {
    /// Name of the feed the report was built from.
    pub source: String,
    /// Reporting window.
    pub window: DateWindow,
    /// The item.
    pub item: Item,
    /// Ledger rows, opening row first.
    pub rows: Vec<LedgerRow>,
}

/// Value every inventory item over `window`.
///
/// With `hide_zero_balance`, items whose closing quantity is zero are left
/// out; the summary counts what is listed.
pub fn closing_stock(
    feed: &dyn TransactionFeed,
    window: &DateWindow,
    hide_zero_balance: bool,
) -> Result<ClosingStock> {
    let items = feed
        .items(ItemKind::Inventory)
        .context("failed to list inventory items")?;
    tracing::debug!(source = feed.name(), items = items.len(), "valuing inventory");

    let valued: Vec<ValuationResult> = items
        .par_iter()
        .map(|item| {
            let opening = feed.opening(item.code, ItemKind::Inventory)?;
            let transactions = feed.transactions(item.code)?;
            let valuation = compute_valuation(&opening, &transactions, window);
            Ok(ValuationResult::new(item, valuation))
        })
        .collect::<Result<_>>()?;

    let items: Vec<ValuationResult> = valued
        .into_iter()
        .filter(|r| !hide_zero_balance || !r.valuation.closing_quantity.is_zero())
        .collect();

    let zero_quantity_items = items
        .iter()
        .filter(|r| r.valuation.closing_quantity.is_zero())
        .count();
    let summary = StockSummary {
        total_items: items.len(),
        zero_quantity_items,
        non_zero_items: items.len() - zero_quantity_items,
        opening_value: items.iter().map(|r| r.valuation.opening_value).sum(),
        closing_value: items.iter().map(|r| r.valuation.closing_value).sum(),
    };

    Ok(ClosingStock {
        source: feed.name().to_string(),
        window: *window,
        hide_zero_balance,
        items,
        summary,
    })
}

/// Aggregate every account over `window`, dropping all-zero accounts.
pub fn closing_balance(feed: &dyn TransactionFeed, window: &DateWindow) -> Result<ClosingBalance> {
    let accounts = feed
        .items(ItemKind::Account)
        .context("failed to list accounts")?;
    tracing::debug!(source = feed.name(), accounts = accounts.len(), "aggregating accounts");

    let summaries: Vec<BalanceResult> = accounts
        .par_iter()
        .map(|account| {
            let opening = feed.opening(account.code, ItemKind::Account)?;
            let transactions = feed.transactions(account.code)?;
            let summary = compute_balance(opening.balance(), &transactions, window);
            Ok(BalanceResult::new(account, summary))
        })
        .collect::<Result<_>>()?;

    Ok(ClosingBalance {
        source: feed.name().to_string(),
        window: *window,
        accounts: summaries
            .into_iter()
            .filter(|r| r.summary.is_reportable())
            .collect(),
    })
}

/// Build the stock ledger of the inventory item `code`.
pub fn stock_ledger(feed: &dyn TransactionFeed, code: i64, window: &DateWindow) -> Result<StockLedger> {
    let Some(item) = feed.item(code, ItemKind::Inventory)? else {
        if let Some(other) = feed.item(code, ItemKind::Account)? {
            bail!("{other} is an account, not an inventory item");
        }
        return Err(FeedError::UnknownItem {
            code,
            kind: ItemKind::Inventory,
        }
        .into());
    };

    let opening = feed.opening(code, ItemKind::Inventory)?;
    let transactions = feed.transactions(code)?;
    let rows: Vec<LedgerRow> = build_ledger(&opening, &transactions, window).collect();
    tracing::debug!(source = feed.name(), code, rows = rows.len(), "built stock ledger");

    Ok(StockLedger {
        source: feed.name().to_string(),
        window: *window,
        item,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stockledger_core::{NaiveDate, OpeningPosition, Transaction};

    struct Fixture;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    impl TransactionFeed for Fixture {
        fn name(&self) -> &str {
            "fixture"
        }

        fn items(&self, kind: ItemKind) -> Result<Vec<Item>, FeedError> {
            Ok(match kind {
                ItemKind::Inventory => vec![
                    Item::inventory(2, "Bolt"),
                    Item::inventory(1, "Widget"),
                ],
                ItemKind::Account => vec![Item::account(10, "Cash"), Item::account(11, "Idle")],
                ItemKind::Other(_) => Vec::new(),
            })
        }

        fn opening(&self, code: i64, _kind: ItemKind) -> Result<OpeningPosition, FeedError> {
            Ok(match code {
                1 => OpeningPosition::new(dec!(100), dec!(1000)),
                10 => OpeningPosition::balance_of(dec!(500)),
                _ => OpeningPosition::zero(),
            })
        }

        fn transactions(&self, code: i64) -> Result<Vec<Transaction>, FeedError> {
            Ok(match code {
                1 => vec![
                    Transaction::new(1, date(2024, 1, 15), dec!(50)).with_amount(dec!(500)),
                    Transaction::new(1, date(2024, 2, 15), dec!(-20)),
                ],
                2 => vec![
                    Transaction::new(2, date(2024, 1, 10), dec!(5)).with_amount(dec!(10)),
                    Transaction::new(2, date(2024, 1, 20), dec!(-5)),
                ],
                10 => vec![Transaction::new(10, date(2024, 1, 5), dec!(-50))],
                _ => Vec::new(),
            })
        }
    }

    #[test]
    fn test_closing_stock() {
        let report = closing_stock(&Fixture, &DateWindow::unbounded(), false).unwrap();

        assert_eq!(report.source, "fixture");
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.items[0].name, "Bolt");
        assert_eq!(report.items[1].valuation.closing_value, dec!(1300));
        assert_eq!(report.summary.total_items, 2);
        assert_eq!(report.summary.zero_quantity_items, 1);
        assert_eq!(report.summary.non_zero_items, 1);
        assert_eq!(report.summary.closing_value, dec!(1300));
    }

    #[test]
    fn test_closing_stock_hides_zero() {
        let report = closing_stock(&Fixture, &DateWindow::unbounded(), true).unwrap();

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].code, 1);
        assert_eq!(report.summary.zero_quantity_items, 0);
    }

    #[test]
    fn test_closing_balance_drops_idle_accounts() {
        let report = closing_balance(&Fixture, &DateWindow::unbounded()).unwrap();

        assert_eq!(report.accounts.len(), 1);
        assert_eq!(report.accounts[0].summary.closing_balance, dec!(450));
    }

    #[test]
    fn test_stock_ledger() {
        let report = stock_ledger(&Fixture, 1, &DateWindow::unbounded()).unwrap();
        assert_eq!(report.item.name, "Widget");
        assert_eq!(report.rows.len(), 3);
    }

    #[test]
    fn test_stock_ledger_rejects_unknown_and_accounts() {
        let err = stock_ledger(&Fixture, 99, &DateWindow::unbounded()).unwrap_err();
        assert_eq!(err.to_string(), "no inventory item with code 99");

        let err = stock_ledger(&Fixture, 10, &DateWindow::unbounded()).unwrap_err();
        assert_eq!(err.to_string(), "Cash (10) is an account, not an inventory item");
    }
}
