//! Record shape abstraction used by the CSV loader and the bulk inserter.
//!
//! A record is an ordered set of named string cells. The loader produces
//! [`CsvRecord`]s; [`crate::db::insert_records`] accepts anything implementing
//! [`Record`].

use indexmap::IndexMap;

/// One CSV row keyed by header name, in file column order
pub type CsvRecord = IndexMap<String, String>;

/// Capability set needed to write a row into a table.
pub trait Record {
    /// Column names in their natural order
    fn columns(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Cell value for a column, if present
    fn get(&self, column: &str) -> Option<&str>;
}

impl Record for IndexMap<String, String> {
    fn columns(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.keys().map(String::as_str))
    }

    fn get(&self, column: &str) -> Option<&str> {
        IndexMap::get(self, column).map(String::as_str)
    }
}
