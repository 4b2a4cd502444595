//! Reader for the source system's CSV export.
//!
//! The export is three tables:
//!
//! | table | columns |
//! |---|---|
//! | masters | `Code, MasterType, Name` |
//! | transactions | `MasterCode1, VchType, RecType, VchNo, Date, Value1, Value3` |
//! | openings | `MasterCode, MasterType, D1, D3` |
//!
//! A bad row never fails the read. It is skipped and reported as a warning
//! carrying the table name and the row number.

use crate::config::ExportConfig;
use crate::date::parse_date;
use crate::ImportError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use stockledger_core::{Item, ItemKind, OpeningPosition, Transaction};

const MASTER_COLUMNS: &[&str] = &["Code", "MasterType", "Name"];
const TRANSACTION_COLUMNS: &[&str] = &[
    "MasterCode1",
    "VchType",
    "RecType",
    "VchNo",
    "Date",
    "Value1",
    "Value3",
];
const FOLIO_COLUMNS: &[&str] = &["MasterCode", "MasterType", "D1", "D3"];

/// One row of the opening table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolioRow {
    /// Master code the opening belongs to.
    pub code: i64,
    /// Master type recorded with the opening.
    pub kind: ItemKind,
    /// Opening quantity (`D1`) and value (`D3`).
    pub position: OpeningPosition,
}

/// The parsed contents of one export.
#[derive(Debug, Clone, Default)]
pub struct Export {
    /// Masters of an imported master type, in file order.
    pub masters: Vec<Item>,
    /// Transactions in file order, voucher numbers trimmed.
    pub transactions: Vec<Transaction>,
    /// Opening rows in file order.
    pub folios: Vec<FolioRow>,
    /// Number of rows rejected while parsing.
    pub rejected: usize,
    /// One message per rejected row.
    pub warnings: Vec<String>,
}

impl Export {
    fn reject(&mut self, warning: String) {
        tracing::debug!("{warning}");
        self.rejected += 1;
        self.warnings.push(warning);
    }
}

/// Reads an export directory into an [`Export`].
pub struct ExportReader {
    config: ExportConfig,
}

impl ExportReader {
    /// Create a new reader for the given export layout.
    pub const fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// The export layout this reader uses.
    pub const fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Read all three tables.
    pub fn read(&self) -> Result<Export, ImportError> {
        let masters = read_file(&self.config.master_path())?;
        let transactions = read_file(&self.config.transaction_path())?;
        let folios = read_file(&self.config.folio_path())?;

        let mut export = Export::default();
        self.parse_masters(&masters, &mut export)?;
        self.parse_transactions(&transactions, &mut export)?;
        self.parse_folios(&folios, &mut export)?;

        tracing::info!(
            dir = %self.config.export_dir.display(),
            masters = export.masters.len(),
            transactions = export.transactions.len(),
            folios = export.folios.len(),
            rejected = export.rejected,
            "read export"
        );
        Ok(export)
    }

    /// Parse master table content into `export`.
    ///
    /// Masters of a type that is not imported are skipped silently.
    pub fn parse_masters(&self, content: &str, export: &mut Export) -> Result<(), ImportError> {
        let table = self.config.master_file.clone();
        self.each_row(content, &table, MASTER_COLUMNS, |row_num, fields| {
            let code = parse_code(fields[0]).ok_or_else(|| format!("invalid Code '{}'", fields[0]))?;
            let master_type = parse_int(fields[1])
                .ok_or_else(|| format!("invalid MasterType '{}' for master {code}", fields[1]))?;
            let kind = ItemKind::from_master_type(master_type);
            if !kind.is_imported() {
                tracing::debug!(table = %table, row = row_num, code, master_type, "skipping master");
                return Ok(());
            }
            export.masters.push(Item::new(code, fields[2].trim(), kind));
            Ok(())
        })
        .map(|warnings| warnings.into_iter().for_each(|w| export.reject(w)))
    }

    /// Parse transaction table content into `export`.
    pub fn parse_transactions(
        &self,
        content: &str,
        export: &mut Export,
    ) -> Result<(), ImportError> {
        let table = self.config.transaction_file.clone();
        self.each_row(content, &table, TRANSACTION_COLUMNS, |_, fields| {
            let voucher = fields[3].trim();
            let code = parse_code(fields[0]).ok_or_else(|| {
                format!("invalid MasterCode1 '{}' for voucher '{voucher}'", fields[0])
            })?;

            let raw_date = fields[4].trim();
            if raw_date.is_empty() {
                return Err(format!("missing date for voucher '{voucher}'"));
            }
            let date = parse_date(raw_date)
                .ok_or_else(|| format!("invalid date '{raw_date}' for voucher '{voucher}'"))?;

            let voucher_type = parse_int(fields[1])
                .ok_or_else(|| format!("invalid VchType '{}' for voucher '{voucher}'", fields[1]))?;
            let rec_type = parse_int(fields[2])
                .ok_or_else(|| format!("invalid RecType '{}' for voucher '{voucher}'", fields[2]))?;
            let quantity = parse_number(fields[5])
                .ok_or_else(|| format!("invalid Value1 '{}' for voucher '{voucher}'", fields[5]))?;
            let amount = parse_number(fields[6])
                .ok_or_else(|| format!("invalid Value3 '{}' for voucher '{voucher}'", fields[6]))?;

            export.transactions.push(
                Transaction::new(code, date, quantity)
                    .with_amount(amount)
                    .with_voucher(voucher)
                    .with_voucher_type(voucher_type)
                    .with_rec_type(rec_type),
            );
            Ok(())
        })
        .map(|warnings| warnings.into_iter().for_each(|w| export.reject(w)))
    }

    /// Parse opening table content into `export`.
    pub fn parse_folios(&self, content: &str, export: &mut Export) -> Result<(), ImportError> {
        let table = self.config.folio_file.clone();
        self.each_row(content, &table, FOLIO_COLUMNS, |_, fields| {
            let code = parse_code(fields[0])
                .ok_or_else(|| format!("invalid MasterCode '{}'", fields[0]))?;
            let master_type = parse_int(fields[1])
                .ok_or_else(|| format!("invalid MasterType '{}' for master {code}", fields[1]))?;
            let quantity = parse_number(fields[2])
                .ok_or_else(|| format!("invalid D1 '{}' for master {code}", fields[2]))?;
            let value = parse_number(fields[3])
                .ok_or_else(|| format!("invalid D3 '{}' for master {code}", fields[3]))?;

            export.folios.push(FolioRow {
                code,
                kind: ItemKind::from_master_type(master_type),
                position: OpeningPosition::new(quantity, value),
            });
            Ok(())
        })
        .map(|warnings| warnings.into_iter().for_each(|w| export.reject(w)))
    }

    /// Run `parse_row` over every data row, returning the row warnings.
    ///
    /// `parse_row` receives the fields in the order of `columns`, whatever
    /// their order in the file.
    fn each_row<F>(
        &self,
        content: &str,
        table: &str,
        columns: &[&str],
        mut parse_row: F,
    ) -> Result<Vec<String>, ImportError>
    where
        F: FnMut(usize, &[&str]) -> Result<(), String>,
    {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.config.has_header)
            .delimiter(self.config.delimiter_byte()?)
            .flexible(true)
            .from_reader(content.as_bytes());

        let indices: Vec<usize> = if self.config.has_header {
            let headers = reader.headers().map_err(|source| ImportError::Csv {
                path: table.into(),
                source,
            })?;
            let header_map: HashMap<String, usize> = headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
                .collect();
            columns
                .iter()
                .map(|name| {
                    header_map
                        .get(&name.to_ascii_lowercase())
                        .copied()
                        .ok_or_else(|| ImportError::MissingColumn {
                            path: table.into(),
                            column: (*name).to_string(),
                        })
                })
                .collect::<Result<_, _>>()?
        } else {
            (0..columns.len()).collect()
        };

        let mut warnings = Vec::new();
        let mut row_num = 0;

        for result in reader.records() {
            row_num += 1;
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    warnings.push(format!("{table} row {row_num}: parse error: {e}"));
                    continue;
                }
            };

            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            let fields: Vec<&str> = indices.iter().map_while(|&i| record.get(i)).collect();
            if fields.len() < indices.len() {
                warnings.push(format!(
                    "{table} row {row_num}: expected {} columns, found {}",
                    columns.len(),
                    record.len()
                ));
                continue;
            }

            if let Err(e) = parse_row(row_num, &fields) {
                warnings.push(format!("{table} row {row_num}: {e}"));
            }
        }

        Ok(warnings)
    }
}

fn read_file(path: &Path) -> Result<String, ImportError> {
    fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a number, handling thousands separators, parentheses for negatives
/// and scientific notation.
fn parse_number(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (is_negative, s) = if s.starts_with('(') && s.ends_with(')') {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };

    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != ' ').collect();
    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;

    if is_negative {
        Some(-value)
    } else {
        Some(value)
    }
}

/// Parse an integer field. Drivers sometimes write integers as `6.0`.
fn parse_int(s: &str) -> Option<i32> {
    let s = s.trim();
    s.parse().ok().or_else(|| {
        let value = parse_number(s)?;
        if value.fract().is_zero() {
            value.to_i32()
        } else {
            None
        }
    })
}

fn parse_code(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse().ok().or_else(|| {
        let value = parse_number(s)?;
        if value.fract().is_zero() {
            value.to_i64()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stockledger_core::NaiveDate;

    fn reader() -> ExportReader {
        ExportReader::new(ExportConfig::new("unused"))
    }

    // ========== Number parsing ==========

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("100.50"), Some(dec!(100.50)));
        assert_eq!(parse_number("-20"), Some(dec!(-20)));
        assert_eq!(parse_number("1,234.56"), Some(dec!(1234.56)));
        assert_eq!(parse_number("(50.00)"), Some(dec!(-50.00)));
        assert_eq!(parse_number("1.5e2"), Some(dec!(150)));
        assert_eq!(parse_number(" 7 "), Some(dec!(7)));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("6"), Some(6));
        assert_eq!(parse_int("6.0"), Some(6));
        assert_eq!(parse_int("6.5"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_code("1001"), Some(1001));
    }

    // ========== Masters ==========

    #[test]
    fn test_parse_masters_filters_types() {
        let content = "Code,MasterType,Name\n1001,6,Widget\n2001,2,Cash\n3001,9,Group\n4001,5,Ignored\n";
        let mut export = Export::default();
        reader().parse_masters(content, &mut export).unwrap();

        assert_eq!(export.masters.len(), 3);
        assert_eq!(export.masters[0], Item::inventory(1001, "Widget"));
        assert_eq!(export.masters[1], Item::account(2001, "Cash"));
        assert_eq!(export.masters[2].kind, ItemKind::Other(9));
        assert!(export.warnings.is_empty());
    }

    #[test]
    fn test_parse_masters_reordered_header() {
        let content = "Name,Code,MasterType\nWidget,1001,6\n";
        let mut export = Export::default();
        reader().parse_masters(content, &mut export).unwrap();
        assert_eq!(export.masters, vec![Item::inventory(1001, "Widget")]);
    }

    #[test]
    fn test_parse_masters_missing_column() {
        let content = "Code,Name\n1001,Widget\n";
        let mut export = Export::default();
        let err = reader().parse_masters(content, &mut export).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn { ref column, .. } if column == "MasterType"));
    }

    #[test]
    fn test_parse_masters_bad_row_is_warning() {
        let content = "Code,MasterType,Name\nabc,6,Widget\n1002,6,Gadget\n";
        let mut export = Export::default();
        reader().parse_masters(content, &mut export).unwrap();

        assert_eq!(export.masters.len(), 1);
        assert_eq!(export.rejected, 1);
        assert_eq!(export.warnings, vec!["master1.csv row 1: invalid Code 'abc'"]);
    }

    // ========== Transactions ==========

    #[test]
    fn test_parse_transactions() {
        let content = "MasterCode1,VchType,RecType,VchNo,Date,Value1,Value3\n\
                       1001,1,1, VCH001 ,2024-01-15T00:00:00,50,500\n\
                       1001,2,1,VCH002,2024-02-15,-20,-200\n";
        let mut export = Export::default();
        reader().parse_transactions(content, &mut export).unwrap();

        assert_eq!(export.transactions.len(), 2);
        let first = &export.transactions[0];
        assert_eq!(first.code, 1001);
        assert_eq!(first.voucher_no, "VCH001");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(first.quantity, dec!(50));
        assert_eq!(first.amount, dec!(500));
        assert_eq!(export.transactions[1].voucher_type, 2);
    }

    #[test]
    fn test_parse_transactions_date_problems() {
        let content = "MasterCode1,VchType,RecType,VchNo,Date,Value1,Value3\n\
                       1001,1,1,A,,50,500\n\
                       1001,1,1,B,not-a-date,50,500\n\
                       1001,1,1,C,2024-03-01,50,500\n";
        let mut export = Export::default();
        reader().parse_transactions(content, &mut export).unwrap();

        assert_eq!(export.transactions.len(), 1);
        assert_eq!(export.rejected, 2);
        assert_eq!(export.warnings[0], "tran2.csv row 1: missing date for voucher 'A'");
        assert_eq!(
            export.warnings[1],
            "tran2.csv row 2: invalid date 'not-a-date' for voucher 'B'"
        );
    }

    #[test]
    fn test_parse_transactions_short_row() {
        let content = "MasterCode1,VchType,RecType,VchNo,Date,Value1,Value3\n1001,1,1\n";
        let mut export = Export::default();
        reader().parse_transactions(content, &mut export).unwrap();

        assert!(export.transactions.is_empty());
        assert_eq!(export.warnings, vec!["tran2.csv row 1: expected 7 columns, found 3"]);
    }

    #[test]
    fn test_headerless_semicolon_export() {
        let config = ExportConfig::builder("unused")
            .delimiter(';')
            .has_header(false)
            .build()
            .unwrap();
        let content = "1001;1;2;V1;15/01/2024;1,500;30\n";
        let mut export = Export::default();
        ExportReader::new(config)
            .parse_transactions(content, &mut export)
            .unwrap();

        assert_eq!(export.transactions.len(), 1);
        assert_eq!(export.transactions[0].rec_type, 2);
        assert_eq!(export.transactions[0].quantity, dec!(1500));
    }

    #[test]
    fn test_non_ascii_delimiter_is_an_error() {
        let mut config = ExportConfig::new("unused");
        config.delimiter = '→';
        let mut export = Export::default();
        let err = ExportReader::new(config)
            .parse_transactions("1001,1,1,V1,2024-01-15,1,1\n", &mut export)
            .unwrap_err();

        assert!(matches!(err, ImportError::InvalidDelimiter { delimiter: '→' }));
        assert!(export.transactions.is_empty());
    }

    // ========== Folios ==========

    #[test]
    fn test_parse_folios() {
        let content = "MasterCode,MasterType,D1,D3\n1001,6,100,1000\n2001,2,500,0\n";
        let mut export = Export::default();
        reader().parse_folios(content, &mut export).unwrap();

        assert_eq!(export.folios.len(), 2);
        assert_eq!(export.folios[0].kind, ItemKind::Inventory);
        assert_eq!(
            export.folios[0].position,
            OpeningPosition::new(dec!(100), dec!(1000))
        );
        assert_eq!(export.folios[1].position.balance(), dec!(500));
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let content = "MasterCode,MasterType,D1,D3\n,,,\n1001,6,1,2\n";
        let mut export = Export::default();
        reader().parse_folios(content, &mut export).unwrap();
        assert_eq!(export.folios.len(), 1);
        assert!(export.warnings.is_empty());
    }
}
