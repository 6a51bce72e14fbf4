//! Core entity trait and cell value type.
//!
//! Every table in the store is backed by a struct implementing [`Entity`].
//! The trait carries the table name and the column contract shared by the
//! CSV files and the DDL.

use serde::Serialize;
use std::fmt;

use crate::error::{EcomError, Result};
use crate::record::CsvRecord;

/// A single cell of a query result
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            // Whole numbers keep their decimal point: 100.0, not 100
            FieldValue::Real(r) if r.is_finite() && r.fract() == 0.0 => write!(f, "{:.1}", r),
            FieldValue::Real(r) => write!(f, "{}", r),
            FieldValue::Null => write!(f, "NULL"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Real(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Core trait for the five e-commerce entities.
///
/// # Example
///
/// ```ignore
/// #[derive(Serialize)]
/// struct Product { product_id: i64, name: String, category: String, price: f64 }
///
/// impl Entity for Product {
///     const NAME: &'static str = "Product";
///     const TABLE: &'static str = "products";
///     const COLUMNS: &'static [&'static str] = &["product_id", "name", "category", "price"];
///     fn primary_key(&self) -> i64 { self.product_id }
/// }
/// ```
pub trait Entity: Serialize + Sized {
    /// The name of this entity type
    const NAME: &'static str;

    /// Table (and CSV file stem) this entity is stored in
    const TABLE: &'static str;

    /// Column names, in CSV header and DDL order
    const COLUMNS: &'static [&'static str];

    fn primary_key(&self) -> i64;

    /// File name of the CSV holding this entity
    fn csv_file_name() -> String {
        format!("{}.csv", Self::TABLE)
    }

    /// Convert entity to an ordered record of string cells, one per column.
    fn to_record(&self) -> Result<CsvRecord> {
        let value = serde_json::to_value(self)?;
        let serde_json::Value::Object(map) = value else {
            return Err(EcomError::Config(format!(
                "{} did not serialize to an object",
                Self::NAME
            )));
        };

        Self::COLUMNS
            .iter()
            .map(|column| {
                let cell = map.get(*column).ok_or_else(|| {
                    EcomError::Config(format!("{} has no field '{}'", Self::NAME, column))
                })?;
                Ok((column.to_string(), json_value_to_cell(cell)))
            })
            .collect()
    }
}

/// Render a JSON scalar the way it appears in a CSV cell
fn json_value_to_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
