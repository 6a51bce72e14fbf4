//! Upsert-by-primary-key bulk insertion of string records.

use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel::sqlite::Sqlite;
use regex::Regex;
use std::sync::OnceLock;

use crate::db::database::DbConnection;
use crate::error::{EcomError, Result};
use crate::record::Record;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
    })
}

/// Reject names that cannot be spliced into SQL verbatim
pub fn validate_identifier(name: &str) -> Result<&str> {
    if identifier_pattern().is_match(name) {
        Ok(name)
    } else {
        Err(EcomError::InvalidIdentifier(name.to_string()))
    }
}

/// Build the `INSERT OR REPLACE` statement for a table and column list
pub fn upsert_statement(table: &str, columns: &[&str]) -> Result<String> {
    validate_identifier(table)?;
    for column in columns {
        validate_identifier(column)?;
    }

    let placeholders = vec!["?"; columns.len()].join(",");
    Ok(format!(
        "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
        table,
        columns.join(","),
        placeholders
    ))
}

/// Insert every record into `table`, replacing rows whose primary key exists.
///
/// Column order comes from the first record; the rest are assumed to share
/// its keys. A record lacking one of those columns binds NULL for it.
/// Cells are bound as text and converted by the column affinity.
///
/// Returns the number of records written.
pub fn insert_records<R: Record>(
    conn: &mut DbConnection,
    table: &str,
    records: &[R],
) -> Result<usize> {
    let Some(first) = records.first() else {
        return Ok(0);
    };

    let columns: Vec<&str> = first.columns().collect();
    let sql = upsert_statement(table, &columns)?;
    tracing::debug!(table, sql = %sql, rows = records.len(), "Bulk inserting");

    let mut written = 0;
    for record in records {
        let mut query = diesel::sql_query(sql.as_str()).into_boxed::<Sqlite>();
        for column in &columns {
            query = query.bind::<Nullable<Text>, _>(record.get(column));
        }
        written += query.execute(conn)?;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::registry::ensure_tables;
    use crate::record::CsvRecord;
    use diesel::sql_types::BigInt;

    #[derive(QueryableByName)]
    struct Count {
        #[diesel(sql_type = BigInt)]
        n: i64,
    }

    fn product(id: &str, name: &str, price: &str) -> CsvRecord {
        let mut record = CsvRecord::new();
        record.insert("product_id".to_string(), id.to_string());
        record.insert("name".to_string(), name.to_string());
        record.insert("category".to_string(), "Toys".to_string());
        record.insert("price".to_string(), price.to_string());
        record
    }

    fn setup() -> DbConnection {
        let mut conn = DbConnection::establish(":memory:").unwrap();
        ensure_tables(&mut conn).unwrap();
        conn
    }

    fn count(conn: &mut DbConnection) -> i64 {
        diesel::sql_query("SELECT COUNT(*) AS n FROM products")
            .get_result::<Count>(conn)
            .unwrap()
            .n
    }

    #[test]
    fn test_upsert_statement() {
        let sql = upsert_statement("products", &["product_id", "name"]).unwrap();
        assert_eq!(sql, "INSERT OR REPLACE INTO products (product_id,name) VALUES (?,?)");
    }

    #[test]
    fn test_rejects_non_identifier_names() {
        assert!(matches!(
            upsert_statement("products; DROP TABLE orders", &["product_id"]),
            Err(EcomError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            upsert_statement("products", &["name)"]),
            Err(EcomError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_empty_input_is_noop() {
        let mut conn = setup();
        let records: Vec<CsvRecord> = Vec::new();
        // An invalid table name is never looked at when there is nothing to insert
        assert_eq!(insert_records(&mut conn, "not a table", &records).unwrap(), 0);
        assert_eq!(count(&mut conn), 0);
    }

    #[test]
    fn test_replaces_existing_primary_key() {
        let mut conn = setup();
        insert_records(&mut conn, "products", &[product("1", "Widget", "2.50")]).unwrap();
        insert_records(&mut conn, "products", &[product("1", "Gadget", "3.75")]).unwrap();

        let rows = crate::db::schema::products::table
            .select(crate::models::Product::as_select())
            .load(&mut conn)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Gadget");
        assert_eq!(rows[0].price, 3.75);
    }

    #[test]
    fn test_missing_column_fails_not_null() {
        let mut conn = setup();
        let mut broken = product("2", "Widget", "1.00");
        broken.shift_remove("category");

        let records = vec![product("1", "Gadget", "1.00"), broken];
        let result = insert_records(&mut conn, "products", &records);
        assert!(matches!(result, Err(EcomError::Database(_))));
    }
}
