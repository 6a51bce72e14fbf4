//! Synthetic e-commerce dataset generation.
//!
//! Foreign keys are always drawn from already generated primary keys, so a
//! dataset is referentially intact by construction. Output is fully
//! determined by the seed and the anchor date.

use chrono::{Local, NaiveDate, TimeDelta};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::collections::HashSet;
use std::path::Path;

use crate::config::GeneratorConfig;
use crate::entity::Entity;
use crate::error::{EcomError, Result};
use crate::models::{Customer, Order, OrderItem, Product, Review};

pub const CATEGORIES: [&str; 5] = ["Electronics", "Home", "Clothing", "Toys", "Beauty"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// All five entity sets of one generated run
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub reviews: Vec<Review>,
}

struct Generator {
    rng: StdRng,
    today: NaiveDate,
    history_days: i64,
}

impl Generator {
    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.random_range(0..items.len())]
    }

    fn date(&mut self) -> Result<String> {
        let days_ago = self.rng.random_range(0..=self.history_days);
        let date = TimeDelta::try_days(days_ago)
            .and_then(|delta| self.today.checked_sub_signed(delta))
            .ok_or_else(|| history_out_of_range(self.today, self.history_days))?;
        Ok(date.format(DATE_FORMAT).to_string())
    }
}

fn history_out_of_range(today: NaiveDate, history_days: i64) -> EcomError {
    EcomError::Config(format!(
        "history_days = {} reaches before the earliest representable date (anchor {})",
        history_days, today
    ))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Dataset {
    /// Generate a dataset from `config`.
    ///
    /// Orders and reviews need at least one product and customer to point
    /// at; with either set empty they are left empty too. A `history_days`
    /// window reaching past the calendar range chrono supports is a
    /// configuration error.
    pub fn generate(config: &GeneratorConfig) -> Result<Self> {
        let today = config.today.unwrap_or_else(|| Local::now().date_naive());
        let history_days = config.history_days.max(0);
        TimeDelta::try_days(history_days)
            .and_then(|delta| today.checked_sub_signed(delta))
            .ok_or_else(|| history_out_of_range(today, history_days))?;

        let mut synth = Generator {
            rng: StdRng::seed_from_u64(config.seed),
            today,
            history_days,
        };

        let products: Vec<Product> = (1..=config.products as i64)
            .map(|i| Product {
                product_id: i,
                name: format!("Product{}", i),
                category: synth.pick(&CATEGORIES).to_string(),
                price: round_cents(synth.rng.random_range(5.0..=500.0)),
            })
            .collect();

        let customers = (1..=config.customers as i64)
            .map(|i| -> Result<Customer> {
                Ok(Customer {
                    customer_id: i,
                    first_name: format!("First{}", i),
                    last_name: format!("Last{}", i),
                    email: format!("user{}@example.com", i),
                    signup_date: synth.date()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut orders = Vec::new();
        let mut order_items = Vec::new();
        let mut reviews = Vec::new();

        if !products.is_empty() && !customers.is_empty() {
            let max_items = config.max_items_per_order.max(1);
            let max_quantity = config.max_quantity.max(1);

            for order_id in 1..=config.orders as i64 {
                let customer_id = synth.pick(&customers).customer_id;
                let order_date = synth.date()?;
                let item_count = synth.rng.random_range(1..=max_items);

                let mut total = 0.0;
                for _ in 0..item_count {
                    let product = synth.pick(&products);
                    let quantity = synth.rng.random_range(1..=max_quantity);
                    total += product.price * quantity as f64;
                    order_items.push(OrderItem {
                        order_item_id: order_items.len() as i64 + 1,
                        order_id,
                        product_id: product.product_id,
                        quantity,
                        unit_price: product.price,
                    });
                }

                orders.push(Order {
                    order_id,
                    customer_id,
                    order_date,
                    total_amount: round_cents(total),
                });
            }

            for review_id in 1..=config.reviews as i64 {
                let product_id = synth.pick(&products).product_id;
                let customer_id = synth.pick(&customers).customer_id;
                reviews.push(Review {
                    review_id,
                    product_id,
                    customer_id,
                    rating: synth.rng.random_range(1..=5),
                    review_text: "Good product".to_string(),
                    review_date: synth.date()?,
                });
            }
        }

        tracing::info!(
            products = products.len(),
            customers = customers.len(),
            orders = orders.len(),
            order_items = order_items.len(),
            reviews = reviews.len(),
            seed = config.seed,
            "Generated dataset"
        );

        Ok(Dataset {
            products,
            customers,
            orders,
            order_items,
            reviews,
        })
    }

    /// Check that every foreign key resolves to a generated primary key.
    ///
    /// Returns one message per dangling reference.
    pub fn check_integrity(&self) -> Vec<String> {
        let product_ids: HashSet<i64> = self.products.iter().map(Entity::primary_key).collect();
        let customer_ids: HashSet<i64> = self.customers.iter().map(Entity::primary_key).collect();
        let order_ids: HashSet<i64> = self.orders.iter().map(Entity::primary_key).collect();

        let mut problems = Vec::new();
        for order in &self.orders {
            if !customer_ids.contains(&order.customer_id) {
                problems.push(format!(
                    "order {} references missing customer {}",
                    order.order_id, order.customer_id
                ));
            }
        }
        for item in &self.order_items {
            if !order_ids.contains(&item.order_id) {
                problems.push(format!(
                    "order item {} references missing order {}",
                    item.order_item_id, item.order_id
                ));
            }
            if !product_ids.contains(&item.product_id) {
                problems.push(format!(
                    "order item {} references missing product {}",
                    item.order_item_id, item.product_id
                ));
            }
        }
        for review in &self.reviews {
            if !product_ids.contains(&review.product_id) {
                problems.push(format!(
                    "review {} references missing product {}",
                    review.review_id, review.product_id
                ));
            }
            if !customer_ids.contains(&review.customer_id) {
                problems.push(format!(
                    "review {} references missing customer {}",
                    review.review_id, review.customer_id
                ));
            }
        }
        problems
    }

    /// Write the five CSV files into `dir`, returning their file names
    pub fn write_csv<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| EcomError::io(dir, e))?;

        Ok(vec![
            write_entities(dir, &self.products)?,
            write_entities(dir, &self.customers)?,
            write_entities(dir, &self.orders)?,
            write_entities(dir, &self.order_items)?,
            write_entities(dir, &self.reviews)?,
        ])
    }
}

/// Write one entity set as `<table>.csv`, header first
fn write_entities<E: Entity>(dir: &Path, entities: &[E]) -> Result<String> {
    let file_name = E::csv_file_name();
    let path = dir.join(&file_name);

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(E::COLUMNS)?;
    for entity in entities {
        let record = entity.to_record()?;
        writer.write_record(record.values())?;
    }
    writer.flush().map_err(|e| EcomError::io(&path, e))?;

    tracing::debug!(path = %path.display(), rows = entities.len(), "Wrote {}", E::NAME);
    Ok(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            products: 5,
            customers: 8,
            orders: 20,
            reviews: 12,
            today: NaiveDate::from_ymd_opt(2025, 1, 15),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_counts_and_dense_keys() {
        let data = Dataset::generate(&small_config()).unwrap();

        assert_eq!(data.products.len(), 5);
        assert_eq!(data.customers.len(), 8);
        assert_eq!(data.orders.len(), 20);
        assert_eq!(data.reviews.len(), 12);
        assert!(data.order_items.len() >= 20 && data.order_items.len() <= 80);

        for (idx, item) in data.order_items.iter().enumerate() {
            assert_eq!(item.order_item_id, idx as i64 + 1);
        }
        for (idx, product) in data.products.iter().enumerate() {
            assert_eq!(product.product_id, idx as i64 + 1);
        }
    }

    #[test]
    fn test_value_ranges() {
        let data = Dataset::generate(&small_config()).unwrap();

        for product in &data.products {
            assert!(product.price >= 5.0 && product.price <= 500.0);
            assert!(CATEGORIES.contains(&product.category.as_str()));
        }
        for item in &data.order_items {
            assert!((1..=3).contains(&item.quantity));
        }
        for review in &data.reviews {
            assert!((1..=5).contains(&review.rating));
        }
        let earliest = NaiveDate::from_ymd_opt(2023, 1, 16).unwrap();
        for order in &data.orders {
            let date = NaiveDate::parse_from_str(&order.order_date, DATE_FORMAT).unwrap();
            assert!(date <= NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
            assert!(date >= earliest);
        }
    }

    #[test]
    fn test_order_totals_match_items() {
        let data = Dataset::generate(&small_config()).unwrap();

        for order in &data.orders {
            let sum: f64 = data
                .order_items
                .iter()
                .filter(|item| item.order_id == order.order_id)
                .map(|item| item.unit_price * item.quantity as f64)
                .sum();
            assert!((order.total_amount - sum).abs() < 0.01);
        }
    }

    #[test]
    fn test_unit_price_is_product_price() {
        let data = Dataset::generate(&small_config()).unwrap();

        for item in &data.order_items {
            let product = &data.products[(item.product_id - 1) as usize];
            assert_eq!(item.unit_price, product.price);
        }
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let a = Dataset::generate(&small_config()).unwrap();
        let b = Dataset::generate(&small_config()).unwrap();
        assert_eq!(a, b);

        let other = Dataset::generate(&GeneratorConfig {
            seed: 7,
            ..small_config()
        })
        .unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn test_integrity_reports_dangling_keys() {
        let mut data = Dataset::generate(&small_config()).unwrap();
        assert!(data.check_integrity().is_empty());

        data.reviews[0].product_id = 999;
        let problems = data.check_integrity();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("missing product 999"));
    }

    #[test]
    fn test_no_products_means_no_orders() {
        let data = Dataset::generate(&GeneratorConfig {
            products: 0,
            ..small_config()
        })
        .unwrap();
        assert!(data.orders.is_empty());
        assert!(data.order_items.is_empty());
        assert!(data.reviews.is_empty());
        assert_eq!(data.customers.len(), 8);
    }

    #[test]
    fn test_history_past_calendar_range_is_config_error() {
        let result = Dataset::generate(&GeneratorConfig {
            history_days: 200_000_000,
            ..small_config()
        });
        assert!(matches!(result, Err(EcomError::Config(ref msg)) if msg.contains("history_days")));
    }

    #[test]
    fn test_history_at_calendar_floor_is_accepted() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let history_days = (today - NaiveDate::MIN).num_days();
        let data = Dataset::generate(&GeneratorConfig {
            history_days,
            ..small_config()
        })
        .unwrap();
        assert_eq!(data.customers.len(), 8);
    }
}
