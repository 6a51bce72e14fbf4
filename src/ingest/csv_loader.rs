//! CSV file loading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{EcomError, Result};
use crate::record::CsvRecord;

/// Read a CSV file into records keyed by its header row.
///
/// Cells keep file column order. A file holding only a header yields an
/// empty vector.
///
/// # Errors
/// Returns an I/O error if the file cannot be opened and a CSV error if it is
/// malformed (including rows whose width differs from the header).
pub fn load_csv_rows<P: AsRef<Path>>(path: P) -> Result<Vec<CsvRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| EcomError::io(path, e))?;
    let rows = read_csv_rows(file)?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "Loaded CSV");
    Ok(rows)
}

/// Read CSV records from any reader
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<CsvRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: CsvRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_rows_in_header_order() {
        let input = "product_id,name,category,price\n1,Widget,Toys,2.50\n2,\"Gadget, Deluxe\",Home,10\n";
        let rows = read_csv_rows(input.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, vec!["product_id", "name", "category", "price"]);
        assert_eq!(rows[0]["price"], "2.50");
        assert_eq!(rows[1]["name"], "Gadget, Deluxe");
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let rows = read_csv_rows("order_id,customer_id\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = load_csv_rows(dir.path().join("products.csv"));
        assert!(matches!(result, Err(EcomError::Io { .. })));
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let result = read_csv_rows("a,b\n1,2,3\n".as_bytes());
        assert!(matches!(result, Err(EcomError::Csv(_))));
    }
}
