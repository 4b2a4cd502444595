//! Import an export, then report from the resulting store.

use std::fs;
use std::path::Path;
use stockledger::cmd::import_cmd::import_into_store;
use stockledger::cmd::report_cmd::{write_report, Report};
use stockledger::render::OutputFormat;
use stockledger::reports::closing_stock;
use stockledger_core::{DateWindow, NaiveDate, TransactionFeed};
use stockledger_importer::{ExportConfig, LiveSource, LocalStore};

fn write_export(dir: &Path) {
    fs::write(
        dir.join("master1.csv"),
        "Code,MasterType,Name\n1001,6,Widget\n1002,6,Bolt\n2001,2,Cash\n2002,2,Idle\n",
    )
    .unwrap();
    fs::write(
        dir.join("tran2.csv"),
        "MasterCode1,VchType,RecType,VchNo,Date,Value1,Value3\n\
         1001,1,1,P1,2024-01-15,10,200\n\
         1001,2,1,S1,2024-01-20,-5,0\n\
         1002,1,1,B1,2024-01-05,4,8\n\
         2001,1,1,C1,2024-01-10,-11,0\n",
    )
    .unwrap();
    fs::write(
        dir.join("folio1.csv"),
        "MasterCode,MasterType,D1,D3\n1001,6,10,100\n2001,2,1005,0\n",
    )
    .unwrap();
}

fn imported_store(dir: &Path) -> LocalStore {
    let export_dir = dir.join("export");
    fs::create_dir(&export_dir).unwrap();
    write_export(&export_dir);

    let store_path = dir.join("store.json");
    let summary = import_into_store(ExportConfig::new(&export_dir), &store_path).unwrap();
    assert_eq!(summary.masters, 4);
    assert_eq!(summary.created, 4);
    assert_eq!(summary.errors, 0);

    LocalStore::open(&store_path).unwrap()
}

fn report(feed: &dyn TransactionFeed, report: &Report, window: &DateWindow) -> String {
    let mut out = Vec::new();
    write_report(feed, report, window, OutputFormat::Csv, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_closing_stock_from_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = imported_store(dir.path());

    let csv = report(
        &store,
        &Report::Stock { hide_zero: false },
        &DateWindow::unbounded(),
    );
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "1002,Bolt,0.00,0.00,4.00,8.00,4.00,8.00");
    assert_eq!(lines[2], "1001,Widget,10.00,100.00,5.00,125.00,15.00,225.00");
}

#[test]
fn test_closing_stock_windowed() {
    let dir = tempfile::tempdir().unwrap();
    let store = imported_store(dir.path());

    // Only the sale falls inside; the receipt is folded into the opening
    let window = DateWindow::from(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
    let csv = report(&store, &Report::Stock { hide_zero: true }, &window);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[1], "1002,Bolt,4.00,8.00,0.00,0.00,4.00,8.00");
    assert_eq!(lines[2], "1001,Widget,20.00,300.00,-5.00,-75.00,15.00,225.00");
}

#[test]
fn test_closing_balance_from_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = imported_store(dir.path());

    let csv = report(&store, &Report::Balance, &DateWindow::unbounded());
    assert_eq!(
        csv,
        "Code,Name,Opening,Period,Closing\n2001,Cash,1005.00,-11.00,994.00\n"
    );
}

#[test]
fn test_stock_ledger_from_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = imported_store(dir.path());

    let csv = report(&store, &Report::Ledger { code: 1001 }, &DateWindow::unbounded());
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("0,2024-01-15,Opening Balance,0.00,0.00,10.00,0.00,10.00,100.00,"));
    assert!(lines[2].starts_with("1,2024-01-15,P1,10.00,100.00,10.00,0.00,20.00,300.00,"));
    assert!(lines[3].starts_with("2,2024-01-20,S1,20.00,300.00,0.00,5.00,15.00,225.00,"));
}

#[test]
fn test_ledger_of_account_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = imported_store(dir.path());

    let mut out = Vec::new();
    let err = write_report(
        &store,
        &Report::Ledger { code: 2001 },
        &DateWindow::unbounded(),
        OutputFormat::Text,
        &mut out,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Cash (2001) is an account, not an inventory item");
}

#[test]
fn test_reimport_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let _ = imported_store(dir.path());

    let summary =
        import_into_store(ExportConfig::new(dir.path().join("export")), &dir.path().join("store.json"))
            .unwrap();
    assert_eq!(summary.created, 0);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.skipped, 4);

    let store = LocalStore::open(&dir.path().join("store.json")).unwrap();
    assert_eq!(store.transaction_count(), 4);
}

#[test]
fn test_local_and_live_closing_stock_agree() {
    let dir = tempfile::tempdir().unwrap();
    let export_dir = dir.path().join("export");
    fs::create_dir(&export_dir).unwrap();
    write_export(&export_dir);
    // A second line of P1 on the same day
    fs::write(
        export_dir.join("tran2.csv"),
        "MasterCode1,VchType,RecType,VchNo,Date,Value1,Value3\n\
         1001,1,1,P1,2024-01-15,10,200\n\
         1001,1,1,P1,2024-01-15,5,50\n\
         1001,2,1,S1,2024-01-20,-5,0\n\
         1002,1,1,B1,2024-01-05,4,8\n",
    )
    .unwrap();

    let store_path = dir.path().join("store.json");
    let summary = import_into_store(ExportConfig::new(&export_dir), &store_path).unwrap();
    assert_eq!(summary.created, 4);

    let local = LocalStore::open(&store_path).unwrap();
    let live = LiveSource::connect(ExportConfig::new(&export_dir)).unwrap();

    for window in [
        DateWindow::unbounded(),
        DateWindow::from(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()),
    ] {
        let local_report = closing_stock(&local, &window, false).unwrap();
        let live_report = closing_stock(&live, &window, false).unwrap();
        assert_eq!(local_report.items, live_report.items);
        assert_eq!(local_report.summary, live_report.summary);
    }

    let widget = closing_stock(&local, &DateWindow::unbounded(), false)
        .unwrap()
        .items
        .into_iter()
        .find(|r| r.code == 1001)
        .unwrap();
    assert_eq!(widget.valuation.closing_quantity, rust_decimal::Decimal::from(20));
}
