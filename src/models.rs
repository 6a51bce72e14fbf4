//! The five e-commerce entities.
//!
//! Field order is the CSV header order and the table column order.

use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::{customers, order_items, orders, products, reviews};
use crate::entity::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
}

impl Entity for Product {
    const NAME: &'static str = "Product";
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &["product_id", "name", "category", "price"];

    fn primary_key(&self) -> i64 {
        self.product_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub signup_date: String,
}

impl Entity for Customer {
    const NAME: &'static str = "Customer";
    const TABLE: &'static str = "customers";
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "first_name",
        "last_name",
        "email",
        "signup_date",
    ];

    fn primary_key(&self) -> i64 {
        self.customer_id
    }
}

/// `total_amount` is the rounded sum of the order's line items
#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    pub order_date: String,
    pub total_amount: f64,
}

impl Entity for Order {
    const NAME: &'static str = "Order";
    const TABLE: &'static str = "orders";
    const COLUMNS: &'static [&'static str] =
        &["order_id", "customer_id", "order_date", "total_amount"];

    fn primary_key(&self) -> i64 {
        self.order_id
    }
}

/// `unit_price` is a snapshot of the product price when the order was placed
#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderItem {
    pub order_item_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

impl Entity for OrderItem {
    const NAME: &'static str = "OrderItem";
    const TABLE: &'static str = "order_items";
    const COLUMNS: &'static [&'static str] = &[
        "order_item_id",
        "order_id",
        "product_id",
        "quantity",
        "unit_price",
    ];

    fn primary_key(&self) -> i64 {
        self.order_item_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Review {
    pub review_id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub rating: i64,
    pub review_text: String,
    pub review_date: String,
}

impl Entity for Review {
    const NAME: &'static str = "Review";
    const TABLE: &'static str = "reviews";
    const COLUMNS: &'static [&'static str] = &[
        "review_id",
        "product_id",
        "customer_id",
        "rating",
        "review_text",
        "review_date",
    ];

    fn primary_key(&self) -> i64 {
        self.review_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_item_record() {
        let item = OrderItem {
            order_item_id: 3,
            order_id: 1,
            product_id: 42,
            quantity: 2,
            unit_price: 19.99,
        };

        let record = item.to_record().unwrap();
        let values: Vec<&str> = record.values().map(String::as_str).collect();
        assert_eq!(values, vec!["3", "1", "42", "2", "19.99"]);
        assert_eq!(item.primary_key(), 3);
    }

    #[test]
    fn test_review_csv_file_name() {
        assert_eq!(Review::csv_file_name(), "reviews.csv");
    }
}
