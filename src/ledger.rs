// Ledger - ordered expense records persisted as one CSV table
//
// Records are immutable once written. Every add rewrites the whole file;
// every query is a full scan filtered by owner.

use crate::error::{TrackerError, TrackerResult, ValidationError};
use crate::store::{replace_file, LoadStatus};
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Canonical column set, in file order
pub const COLUMNS: [&str; 4] = ["User", "Name", "Amount", "Category"];

/// Column whose absence makes a file unusable
const OWNER_COLUMN: &str = "User";

/// Worksheet holding an exported ledger
pub const EXPORT_SHEET: &str = "Expenses";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(rename = "User")]
    pub owner: String,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Amount")]
    pub amount: f64,

    #[serde(rename = "Category", default)]
    pub category: String,
}

impl ExpenseRecord {
    pub fn new(owner: &str, name: &str, amount: f64, category: &str) -> Self {
        ExpenseRecord {
            owner: owner.to_string(),
            name: name.to_string(),
            amount,
            category: category.to_string(),
        }
    }
}

/// Parse user-entered amount text into a finite number
pub fn parse_amount(text: &str) -> Result<f64, ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::required("amount"));
    }

    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::new("amount", "Amount must be a number")),
    }
}

#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    records: Vec<ExpenseRecord>,
    load_status: LoadStatus,
}

impl Ledger {
    /// Load the table from `path`.
    ///
    /// A missing file, an unreadable one, or one without the `User` column
    /// all yield an empty ledger; `load_status()` tells them apart.
    pub fn load(path: &Path) -> Self {
        let (records, load_status) = match read_records(path) {
            Ok(Some(records)) => {
                let count = records.len();
                (records, LoadStatus::Loaded { records: count })
            }
            Ok(None) => (Vec::new(), LoadStatus::Fresh),
            Err(reason) => (Vec::new(), LoadStatus::Recovered { reason }),
        };

        match &load_status {
            LoadStatus::Recovered { reason } => {
                warn!(%reason, "starting with an empty ledger");
            }
            LoadStatus::Loaded { records } => {
                debug!(file = %path.display(), records, "ledger loaded");
            }
            LoadStatus::Fresh => {}
        }

        Ledger {
            path: path.to_path_buf(),
            records,
            load_status,
        }
    }

    /// Validate, append and persist one expense; returns the owner's new total.
    pub fn add_expense(
        &mut self,
        owner: &str,
        name: &str,
        amount_text: &str,
        category: &str,
    ) -> TrackerResult<f64> {
        if name.is_empty() {
            return Err(ValidationError::required("name").into());
        }
        let amount = parse_amount(amount_text)?;

        self.records
            .push(ExpenseRecord::new(owner, name, amount, category));

        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }

        let total = self.total_for(owner);
        info!(user = owner, name, amount, category, total, "expense added");
        Ok(total)
    }

    /// Sum of all amounts owned by `owner`; 0 when there are none
    pub fn total_for(&self, owner: &str) -> f64 {
        self.records_for(owner).map(|r| r.amount).sum()
    }

    /// category -> summed amount for `owner`. Callers must not rely on key order.
    pub fn category_breakdown(&self, owner: &str) -> BTreeMap<String, f64> {
        let mut breakdown: BTreeMap<String, f64> = BTreeMap::new();

        for record in self.records_for(owner) {
            *breakdown.entry(record.category.clone()).or_insert(0.0) += record.amount;
        }

        breakdown
    }

    /// `(name, amount)` pairs in insertion order
    pub fn chronological_series(&self, owner: &str) -> Vec<(String, f64)> {
        self.records_for(owner)
            .map(|r| (r.name.clone(), r.amount))
            .collect()
    }

    /// Write every record owned by `owner` (all four columns) to an xlsx
    /// workbook at `destination`, one worksheet named `Expenses`.
    ///
    /// Either the whole file is written or the destination is left untouched.
    pub fn export_for(&self, owner: &str, destination: &Path) -> TrackerResult<usize> {
        let xlsx_err = |e| TrackerError::xlsx(destination, e);

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(EXPORT_SHEET).map_err(xlsx_err)?;

        for (col, title) in (0u16..).zip(COLUMNS) {
            sheet.write_string(0, col, title).map_err(xlsx_err)?;
        }

        let mut count = 0u32;
        for record in self.records_for(owner) {
            let row = count + 1;
            sheet.write_string(row, 0, &record.owner).map_err(xlsx_err)?;
            sheet.write_string(row, 1, &record.name).map_err(xlsx_err)?;
            sheet.write_number(row, 2, record.amount).map_err(xlsx_err)?;
            if !record.category.is_empty() {
                sheet.write_string(row, 3, &record.category).map_err(xlsx_err)?;
            }
            count += 1;
        }

        let bytes = workbook.save_to_buffer().map_err(xlsx_err)?;
        replace_file(destination, |writer| {
            writer
                .write_all(&bytes)
                .map_err(|e| TrackerError::io(destination, e))
        })?;

        info!(user = owner, file = %destination.display(), rows = count, "ledger exported");
        Ok(count as usize)
    }

    pub fn records_for<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a ExpenseRecord> + 'a {
        self.records.iter().filter(move |r| r.owner == owner)
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    fn save(&self) -> TrackerResult<()> {
        replace_file(&self.path, |writer| {
            write_table(writer, &self.path, self.records.iter())
        })
    }
}

/// Header row plus one row per record. The header is written by hand so an
/// empty table still has one.
fn write_table<'a, W, I>(writer: W, path: &Path, records: I) -> TrackerResult<()>
where
    W: Write,
    I: Iterator<Item = &'a ExpenseRecord>,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(COLUMNS)
        .map_err(|e| TrackerError::csv(path, e))?;

    for record in records {
        wtr.serialize(record)
            .map_err(|e| TrackerError::csv(path, e))?;
    }

    wtr.flush().map_err(|e| TrackerError::io(path, e))
}

/// `Ok(None)` = no file; `Err(reason)` = file present but unusable
fn read_records(path: &Path) -> Result<Option<Vec<ExpenseRecord>>, String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(format!("ledger file {} is unreadable: {}", path.display(), e)),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(file);

    let mut rows = rdr.records();
    let header = match rows.next() {
        Some(Ok(header)) => header,
        Some(Err(e)) => return Err(format!("ledger file {} is corrupt: {}", path.display(), e)),
        None => {
            return Err(format!(
                "ledger file {} is empty, missing the {} column",
                path.display(),
                OWNER_COLUMN
            ))
        }
    };

    if !header.iter().any(|column| column == OWNER_COLUMN) {
        return Err(format!(
            "ledger file {} has no {} column",
            path.display(),
            OWNER_COLUMN
        ));
    }

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        let record = row
            .and_then(|row| row.deserialize::<ExpenseRecord>(Some(&header)))
            .map_err(|e| {
                format!(
                    "ledger file {} is corrupt at row {}: {}",
                    path.display(),
                    index + 2,
                    e
                )
            })?;
        records.push(record);
    }

    Ok(Some(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{read_sheet, scratch_dir};
    use std::fs;

    fn create_test_ledger() -> Ledger {
        Ledger::load(&scratch_dir().join("expenses.csv"))
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("3.50"), Ok(3.5));
        assert_eq!(parse_amount(" 12 "), Ok(12.0));
        assert_eq!(parse_amount("-4"), Ok(-4.0));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn test_missing_file_is_fresh() {
        let ledger = create_test_ledger();
        assert!(ledger.is_empty());
        assert_eq!(ledger.load_status(), &LoadStatus::Fresh);
        assert_eq!(ledger.total_for("alice"), 0.0);
        assert!(ledger.category_breakdown("alice").is_empty());
        assert!(ledger.chronological_series("alice").is_empty());
    }

    #[test]
    fn test_coffee_and_bus_scenario() {
        let mut ledger = create_test_ledger();

        ledger.add_expense("alice", "Coffee", "3.50", "Food").unwrap();
        let total = ledger.add_expense("alice", "Bus", "2.00", "Transport").unwrap();

        assert_eq!(total, 5.5);
        assert_eq!(ledger.total_for("alice"), 5.5);

        let breakdown = ledger.category_breakdown("alice");
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown["Food"], 3.5);
        assert_eq!(breakdown["Transport"], 2.0);
    }

    #[test]
    fn test_add_increases_total_by_amount() {
        let mut ledger = create_test_ledger();
        ledger.add_expense("alice", "Rent", "800", "Housing").unwrap();

        let before = ledger.total_for("alice");
        let after = ledger.add_expense("alice", "Lunch", "12.25", "Food").unwrap();

        assert_eq!(after - before, 12.25);
    }

    #[test]
    fn test_owner_isolation() {
        let mut ledger = create_test_ledger();
        ledger.add_expense("alice", "Coffee", "3.50", "Food").unwrap();
        let alice_before = ledger.total_for("alice");

        let bob_total = ledger.add_expense("bob", "Taxi", "40", "Transport").unwrap();

        assert_eq!(bob_total, 40.0);
        assert_eq!(ledger.total_for("alice"), alice_before);
        assert!(!ledger.category_breakdown("alice").contains_key("Transport"));
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let mut ledger = create_test_ledger();
        for (name, amount, category) in [
            ("Coffee", "3.50", "Food"),
            ("Dinner", "27.10", "Food"),
            ("Bus", "2.00", "Transport"),
            ("Book", "15", ""),
        ] {
            ledger.add_expense("alice", name, amount, category).unwrap();
        }

        let breakdown = ledger.category_breakdown("alice");
        let summed: f64 = breakdown.values().sum();

        assert!((summed - ledger.total_for("alice")).abs() < 1e-9);
        assert_eq!(breakdown[""], 15.0);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut ledger = create_test_ledger();
        let err = ledger.add_expense("alice", "", "5", "Food").unwrap_err();

        assert!(matches!(err, TrackerError::Validation(ref v) if v.field == "name"));
        assert!(ledger.is_empty());
        assert!(!ledger.path().exists());
    }

    #[test]
    fn test_unparseable_amount_rejected() {
        let mut ledger = create_test_ledger();

        let err = ledger.add_expense("alice", "Book", "abc", "Misc").unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ref v) if v.field == "amount"));

        let err = ledger.add_expense("alice", "Book", "", "Misc").unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));

        assert!(ledger.is_empty());
    }

    #[test]
    fn test_persist_and_reload_round_trip() {
        let mut ledger = create_test_ledger();
        ledger.add_expense("alice", "Coffee", "3.50", "Food").unwrap();
        ledger.add_expense("bob", "Taxi", "40", "Transport").unwrap();
        ledger.add_expense("alice", "Bus", "2.00", "Transport").unwrap();

        let text = fs::read_to_string(ledger.path()).unwrap();
        assert!(text.starts_with("User,Name,Amount,Category\n"));

        let reloaded = Ledger::load(ledger.path());
        assert_eq!(reloaded.load_status(), &LoadStatus::Loaded { records: 3 });
        assert_eq!(reloaded.records(), ledger.records());
        assert_eq!(
            reloaded.chronological_series("alice"),
            vec![("Coffee".to_string(), 3.5), ("Bus".to_string(), 2.0)]
        );
    }

    #[test]
    fn test_reordered_columns_and_blank_category() {
        let dir = scratch_dir();
        let path = dir.join("expenses.csv");
        fs::write(&path, "Category,Amount,Name,User,Note\nFood,3.5,Coffee,alice,x\n,1,Gum,alice,\n").unwrap();

        let ledger = Ledger::load(&path);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.records()[0], ExpenseRecord::new("alice", "Coffee", 3.5, "Food"));
        assert_eq!(ledger.records()[1].category, "");
    }

    #[test]
    fn test_missing_user_column_starts_fresh() {
        let dir = scratch_dir();
        let path = dir.join("expenses.csv");
        fs::write(&path, "Name,Amount,Category\nCoffee,3.5,Food\n").unwrap();

        let mut ledger = Ledger::load(&path);
        assert!(ledger.is_empty());
        assert!(ledger.load_status().is_recovered());

        // Next write replaces the old rows with the canonical columns
        ledger.add_expense("alice", "Tea", "2", "Food").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some("User,Name,Amount,Category"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_corrupt_row_starts_fresh() {
        let dir = scratch_dir();
        let path = dir.join("expenses.csv");
        fs::write(&path, "User,Name,Amount,Category\nalice,Coffee,lots,Food\n").unwrap();

        let ledger = Ledger::load(&path);
        assert!(ledger.is_empty());
        assert!(ledger.load_status().warning().unwrap().contains("row 2"));
    }

    #[test]
    fn test_export_only_owner_rows() {
        let dir = scratch_dir();
        let mut ledger = Ledger::load(&dir.join("expenses.csv"));
        ledger.add_expense("alice", "Coffee", "3.50", "Food").unwrap();
        ledger.add_expense("bob", "Taxi", "40", "Transport").unwrap();
        ledger.add_expense("alice", "Bus", "2", "Transport").unwrap();

        let destination = dir.join("alice_expenses.xlsx");
        let rows = ledger.export_for("alice", &destination).unwrap();

        assert_eq!(rows, 2);
        assert_eq!(
            read_sheet(&destination),
            vec![
                vec!["User", "Name", "Amount", "Category"],
                vec!["alice", "Coffee", "3.5", "Food"],
                vec!["alice", "Bus", "2", "Transport"],
            ]
        );
        assert!(!dir.join(".alice_expenses.xlsx.tmp").exists());
    }

    #[test]
    fn test_export_with_no_rows_writes_header() {
        let dir = scratch_dir();
        let ledger = Ledger::load(&dir.join("expenses.csv"));
        let destination = dir.join("nobody_expenses.xlsx");

        assert_eq!(ledger.export_for("nobody", &destination).unwrap(), 0);
        assert_eq!(
            read_sheet(&destination),
            vec![vec!["User", "Name", "Amount", "Category"]]
        );
    }

    struct DeniedWriter;

    impl Write for DeniedWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::PermissionDenied, "denied"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_table_reports_writer_failure_as_io() {
        // Enough rows to overflow the csv buffer while serializing
        let records: Vec<ExpenseRecord> = (0..1000)
            .map(|i| ExpenseRecord::new("alice", &format!("Coffee {}", i), 3.5, "Food"))
            .collect();

        let err = write_table(DeniedWriter, Path::new("expenses.csv"), records.iter()).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Io { ref source, .. } if source.kind() == ErrorKind::PermissionDenied
        ));

        let err = write_table(DeniedWriter, Path::new("expenses.csv"), records[..1].iter())
            .unwrap_err();
        assert!(matches!(err, TrackerError::Io { .. }));
    }

    #[test]
    fn test_export_to_unwritable_destination() {
        let dir = scratch_dir();
        let mut ledger = Ledger::load(&dir.join("expenses.csv"));
        ledger.add_expense("alice", "Coffee", "3.50", "Food").unwrap();

        let err = ledger
            .export_for("alice", &dir.join("no-such-dir").join("out.xlsx"))
            .unwrap_err();
        assert!(matches!(err, TrackerError::Io { .. }));
    }

    #[test]
    fn test_failed_save_rolls_back_append() {
        let dir = scratch_dir();
        let mut ledger = Ledger::load(&dir.join("missing").join("expenses.csv"));

        let err = ledger.add_expense("alice", "Coffee", "3.50", "Food").unwrap_err();
        assert!(matches!(err, TrackerError::Io { .. }));
        assert!(ledger.is_empty());
    }
}
