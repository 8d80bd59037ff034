//! CSV parsing for the wholesale dataset.
//!
//! Expected files and the columns we read (any other columns are ignored):
//! - wholesale_companies.csv: company_id, name, location
//! - wholesale_customers.csv: customer_id, name, location, business_type,
//!   credit_limit, [company_id]
//! - wholesale_transactions.csv: [transaction_id], customer_id, company_id,
//!   item_name, quantity, total_amount, inventory_value

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub const COMPANIES_FILE: &str = "wholesale_companies.csv";
pub const CUSTOMERS_FILE: &str = "wholesale_customers.csv";
pub const TRANSACTIONS_FILE: &str = "wholesale_transactions.csv";

/// Deserialize every row of a headered CSV stream into `T`.
///
/// `file` is only used to label errors.
pub fn read_records<T, R>(reader: R, file: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let record: T = result.map_err(|e| csv_error(file, e))?;
        records.push(record);
    }
    Ok(records)
}

fn csv_error(file: &str, err: csv::Error) -> DataLoadError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let reason = match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => err.to_string(),
    };
    DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason,
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn parse_companies(path: &Path) -> Result<Vec<Company>> {
    read_records(open(path)?, &file_label(path))
}

pub fn parse_customers(path: &Path) -> Result<Vec<Customer>> {
    read_records(open(path)?, &file_label(path))
}

pub fn parse_transactions(path: &Path) -> Result<Vec<Transaction>> {
    read_records(open(path)?, &file_label(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSACTIONS_CSV: &str = "\
transaction_id,customer_id,company_id,item_name,quantity,total_amount,inventory_value,transaction_date
1,10,1,Quinoa,5,42.50,300,2023-01-04
2,11,2, Raw Honey ,2,18.00,120,2023-01-05
";

    #[test]
    fn test_read_transactions_ignores_extra_columns() {
        let records: Vec<Transaction> =
            read_records(TRANSACTIONS_CSV.as_bytes(), TRANSACTIONS_FILE).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].transaction_id, Some(1));
        assert_eq!(records[0].customer_id, 10);
        assert_eq!(records[0].item_name, "Quinoa");
        assert_eq!(records[0].quantity, 5.0);
        assert_eq!(records[1].inventory_value, 120.0);
        // Fields are trimmed
        assert_eq!(records[1].item_name, "Raw Honey");
    }

    #[test]
    fn test_read_customers_with_optional_fields() {
        let csv = "customer_id,name,location,business_type,credit_limit\n\
                   1,Acme Grocers,Austin,Retail,5000\n\
                   2,Corner Deli,Dallas,Restaurant,\n";
        let customers: Vec<Customer> = read_records(csv.as_bytes(), CUSTOMERS_FILE).unwrap();

        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].credit_limit, Some(5000.0));
        assert_eq!(customers[1].credit_limit, None);
        assert_eq!(customers[1].company_id, None);
    }

    #[test]
    fn test_parse_error_reports_file_and_line() {
        let csv = "company_id,name,location\n1,Fresh Co,Austin\nnot-a-number,Bad Co,Reno\n";
        let err = read_records::<Company, _>(csv.as_bytes(), COMPANIES_FILE).unwrap_err();

        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, COMPANIES_FILE);
                assert_eq!(line, 3);
            }
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = parse_companies(Path::new("/nonexistent/wholesale_companies.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
