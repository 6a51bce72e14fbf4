//! # ecomdb: synthetic e-commerce data into SQLite
//!
//! Two stages that only share CSV files on disk:
//!
//! - **Generate**: build five related entity sets (products, customers,
//!   orders, order items, reviews) from a fixed seed and write them as CSV.
//! - **Ingest**: drop and recreate five SQLite tables, bulk-load the CSV
//!   files, then run one analytic query computing per-order totals, the top
//!   product and the average product rating.
//!
//! ## Example
//!
//! ```ignore
//! use ecomdb::{Dataset, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! Dataset::generate(&config.generator)?.write_csv(&config.data_dir)?;
//! ecomdb::ingest::run(&config, &mut std::io::stdout())?;
//! ```

// Core modules
pub mod entity;
pub mod error;
pub mod models;
pub mod record;

// Store access
pub mod db;

// Pipeline stages
pub mod analytics;
pub mod config;
pub mod generate;
pub mod ingest;
pub mod report;

// Re-export key types
pub use entity::{Entity, FieldValue};
pub use error::{EcomError, Result};
pub use models::{Customer, Order, OrderItem, Product, Review};
pub use record::{CsvRecord, Record};

pub use analytics::{OrderSummary, ORDER_SUMMARY_QUERY};
pub use config::{GeneratorConfig, PipelineConfig};
pub use db::{Database, DatabaseConfig};
pub use generate::Dataset;
pub use ingest::LoadReport;
pub use report::format_table;
