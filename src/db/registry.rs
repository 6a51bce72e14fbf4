//! Table schema registry.
//!
//! Declares the DDL for every table. Tables are listed in load order, which
//! is also the order the ingestion driver walks them.

use diesel::prelude::*;

use crate::db::database::DbConnection;
use crate::entity::Entity;
use crate::error::Result;
use crate::models::{Customer, Order, OrderItem, Product, Review};

/// One table: its name, CSV columns and `CREATE TABLE IF NOT EXISTS` text
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub ddl: &'static str,
}

impl TableSpec {
    /// File name of the CSV feeding this table
    pub fn csv_file_name(&self) -> String {
        format!("{}.csv", self.name)
    }

    fn for_entity<E: Entity>(ddl: &'static str) -> Self {
        TableSpec {
            name: E::TABLE,
            columns: E::COLUMNS,
            ddl,
        }
    }
}

const PRODUCTS_DDL: &str = "
CREATE TABLE IF NOT EXISTS products (
    product_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    price REAL NOT NULL
)";

const CUSTOMERS_DDL: &str = "
CREATE TABLE IF NOT EXISTS customers (
    customer_id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    signup_date TEXT NOT NULL
)";

const ORDERS_DDL: &str = "
CREATE TABLE IF NOT EXISTS orders (
    order_id INTEGER PRIMARY KEY,
    customer_id INTEGER NOT NULL,
    order_date TEXT NOT NULL,
    total_amount REAL NOT NULL
)";

const ORDER_ITEMS_DDL: &str = "
CREATE TABLE IF NOT EXISTS order_items (
    order_item_id INTEGER PRIMARY KEY,
    order_id INTEGER NOT NULL,
    product_id INTEGER NOT NULL,
    quantity INTEGER NOT NULL,
    unit_price REAL NOT NULL
)";

const REVIEWS_DDL: &str = "
CREATE TABLE IF NOT EXISTS reviews (
    review_id INTEGER PRIMARY KEY,
    product_id INTEGER NOT NULL,
    customer_id INTEGER NOT NULL,
    rating INTEGER NOT NULL,
    review_text TEXT NOT NULL,
    review_date TEXT NOT NULL
)";

/// All tables in load order
pub fn table_specs() -> [TableSpec; 5] {
    [
        TableSpec::for_entity::<Product>(PRODUCTS_DDL),
        TableSpec::for_entity::<Customer>(CUSTOMERS_DDL),
        TableSpec::for_entity::<Order>(ORDERS_DDL),
        TableSpec::for_entity::<OrderItem>(ORDER_ITEMS_DDL),
        TableSpec::for_entity::<Review>(REVIEWS_DDL),
    ]
}

/// Create every registered table that does not exist yet
pub fn ensure_tables(conn: &mut DbConnection) -> Result<()> {
    for spec in table_specs() {
        tracing::debug!(table = spec.name, "Ensuring table exists");
        diesel::sql_query(spec.ddl).execute(conn)?;
    }
    Ok(())
}

/// Drop every registered table, ignoring tables that are absent
pub fn drop_tables(conn: &mut DbConnection) -> Result<()> {
    for spec in table_specs() {
        tracing::debug!(table = spec.name, "Dropping table");
        diesel::sql_query(format!("DROP TABLE IF EXISTS {}", spec.name)).execute(conn)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_load_order() {
        let names: Vec<&str> = table_specs().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec!["products", "customers", "orders", "order_items", "reviews"]
        );
    }

    #[test]
    fn test_ddl_declares_every_column() {
        for spec in table_specs() {
            assert!(spec.ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", spec.name)));
            for column in spec.columns {
                assert!(
                    spec.ddl.contains(&format!("    {} ", column)),
                    "{} DDL is missing column {}",
                    spec.name,
                    column
                );
            }
            assert!(spec.ddl.contains(&format!("{} INTEGER PRIMARY KEY", spec.columns[0])));
        }
    }

    #[test]
    fn test_ensure_tables_is_idempotent() {
        let mut conn = DbConnection::establish(":memory:").unwrap();
        ensure_tables(&mut conn).unwrap();
        ensure_tables(&mut conn).unwrap();
        drop_tables(&mut conn).unwrap();
        drop_tables(&mut conn).unwrap();
    }
}
