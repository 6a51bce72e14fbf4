//! The per-order analytic query.
//!
//! For each order the query computes the item count, the top product by
//! quantity (ties broken by product name) and the average rating of the
//! products in the order. The rating average is taken over the join of line
//! items against reviews, so a product on two line items counts its reviews
//! twice.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Nullable, Text};
use std::path::Path;

use crate::db::database::DbConnection;
use crate::entity::FieldValue;
use crate::error::{EcomError, Result};

/// Query text, written verbatim to the query artifact
pub const ORDER_SUMMARY_QUERY: &str = "WITH order_totals AS (
    SELECT order_id, SUM(quantity) AS total_items
    FROM order_items
    GROUP BY order_id
),
top_items AS (
    SELECT
        oi.order_id,
        p.name AS top_product,
        oi.quantity AS top_product_quantity,
        ROW_NUMBER() OVER (
            PARTITION BY oi.order_id
            ORDER BY oi.quantity DESC, p.name ASC
        ) AS rn
    FROM order_items oi
    JOIN products p ON p.product_id = oi.product_id
),
order_ratings AS (
    SELECT
        oi.order_id,
        AVG(r.rating) AS avg_product_rating
    FROM order_items oi
    LEFT JOIN reviews r ON r.product_id = oi.product_id
    GROUP BY oi.order_id
)
SELECT
    o.order_id,
    o.order_date,
    c.first_name || ' ' || c.last_name AS customer_name,
    o.total_amount,
    ot.total_items,
    ti.top_product,
    ti.top_product_quantity,
    ROUND(orate.avg_product_rating, 2) AS avg_product_rating
FROM orders o
JOIN customers c ON c.customer_id = o.customer_id
LEFT JOIN order_totals ot ON ot.order_id = o.order_id
LEFT JOIN (
    SELECT order_id, top_product, top_product_quantity
    FROM top_items
    WHERE rn = 1
) ti ON ti.order_id = o.order_id
LEFT JOIN order_ratings orate ON orate.order_id = o.order_id
ORDER BY o.order_id;";

/// One result row of [`ORDER_SUMMARY_QUERY`]
#[derive(Debug, Clone, PartialEq, QueryableByName)]
pub struct OrderSummary {
    #[diesel(sql_type = BigInt)]
    pub order_id: i64,
    #[diesel(sql_type = Text)]
    pub order_date: String,
    #[diesel(sql_type = Text)]
    pub customer_name: String,
    #[diesel(sql_type = Double)]
    pub total_amount: f64,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub total_items: Option<i64>,
    #[diesel(sql_type = Nullable<Text>)]
    pub top_product: Option<String>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub top_product_quantity: Option<i64>,
    #[diesel(sql_type = Nullable<Double>)]
    pub avg_product_rating: Option<f64>,
}

impl OrderSummary {
    /// Result column names, in select order
    pub const COLUMNS: [&'static str; 8] = [
        "order_id",
        "order_date",
        "customer_name",
        "total_amount",
        "total_items",
        "top_product",
        "top_product_quantity",
        "avg_product_rating",
    ];

    /// The row as display cells, NULLs included
    pub fn cells(&self) -> Vec<FieldValue> {
        vec![
            self.order_id.into(),
            self.order_date.clone().into(),
            self.customer_name.clone().into(),
            self.total_amount.into(),
            self.total_items.into(),
            self.top_product.clone().into(),
            self.top_product_quantity.into(),
            self.avg_product_rating.into(),
        ]
    }
}

/// Run the analytic query and keep at most `limit` rows
pub fn order_summaries(conn: &mut DbConnection, limit: usize) -> Result<Vec<OrderSummary>> {
    let mut rows = diesel::sql_query(ORDER_SUMMARY_QUERY).load::<OrderSummary>(conn)?;
    tracing::debug!(total = rows.len(), limit, "Analytic query finished");
    rows.truncate(limit);
    Ok(rows)
}

/// Write the query text plus a trailing newline to `path`
pub fn write_query_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, format!("{}\n", ORDER_SUMMARY_QUERY)).map_err(|e| EcomError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_query_file_is_verbatim_with_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("queries.sql");
        write_query_file(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, format!("{}\n", ORDER_SUMMARY_QUERY));
        assert!(written.starts_with("WITH order_totals AS ("));
        assert!(written.ends_with("ORDER BY o.order_id;\n"));
    }

    #[test]
    fn test_cells_render_nulls() {
        let summary = OrderSummary {
            order_id: 9,
            order_date: "2024-01-02".to_string(),
            customer_name: "First1 Last1".to_string(),
            total_amount: 0.0,
            total_items: None,
            top_product: None,
            top_product_quantity: None,
            avg_product_rating: None,
        };

        let cells = summary.cells();
        assert_eq!(cells.len(), OrderSummary::COLUMNS.len());
        assert_eq!(cells[0], FieldValue::Integer(9));
        assert_eq!(cells[4], FieldValue::Null);
        assert_eq!(cells[7], FieldValue::Null);
    }
}
