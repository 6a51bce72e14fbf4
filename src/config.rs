//! Pipeline configuration.
//!
//! Values resolve with precedence CLI flag > environment variable > config
//! file (`ecomdb.yaml`) > built-in default. The CLI applies its own flags on
//! top of what [`PipelineConfig::load`] returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::db::database::{Database, DatabaseConfig};
use crate::error::{EcomError, Result};

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "ecomdb.yaml";

/// Settings for both pipeline stages
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the five CSV files
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    /// Where the analytic query text is written
    pub query_file: PathBuf,
    /// Number of result rows printed after the load
    pub preview_rows: usize,
    pub busy_timeout_ms: u64,
    pub generator: GeneratorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            data_dir: PathBuf::from("."),
            database_path: PathBuf::from("ecom.db"),
            query_file: PathBuf::from("queries.sql"),
            preview_rows: 20,
            busy_timeout_ms: 5000,
            generator: GeneratorConfig::default(),
        }
    }
}

/// Synthetic data generation settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub products: usize,
    pub customers: usize,
    pub orders: usize,
    pub reviews: usize,
    pub max_items_per_order: usize,
    pub max_quantity: i64,
    /// Dates fall within this many days before `today`
    pub history_days: i64,
    /// Anchor date for generated dates; the local date when unset
    pub today: Option<NaiveDate>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            seed: 42,
            products: 50,
            customers: 200,
            orders: 500,
            reviews: 250,
            max_items_per_order: 4,
            max_quantity: 3,
            history_days: 730,
            today: None,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| EcomError::io(path, e))?;

        serde_yaml::from_str(&contents).map_err(|e| {
            EcomError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Resolve configuration from file and environment.
    ///
    /// An explicit `config_file` must exist. Without one, `ecomdb.yaml` in
    /// the working directory is used if present, defaults otherwise.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `ECOMDB_*` overrides looked up through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("ECOMDB_DATA_DIR") {
            tracing::info!("Using data directory from ECOMDB_DATA_DIR: {}", dir);
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("ECOMDB_DATABASE") {
            tracing::info!("Using database from ECOMDB_DATABASE: {}", path);
            self.database_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("ECOMDB_QUERY_FILE") {
            self.query_file = PathBuf::from(path);
        }
        if let Some(rows) = lookup("ECOMDB_PREVIEW_ROWS") {
            self.preview_rows = parse_env("ECOMDB_PREVIEW_ROWS", &rows)?;
        }
        if let Some(seed) = lookup("ECOMDB_SEED") {
            self.generator.seed = parse_env("ECOMDB_SEED", &seed)?;
        }
        Ok(())
    }

    /// Path of the CSV file for `table` inside the data directory
    pub fn csv_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", table))
    }

    /// Store handle for the configured database file
    pub fn database(&self) -> Database {
        Database::new_with_config(
            &self.database_path,
            DatabaseConfig {
                busy_timeout_ms: self.busy_timeout_ms,
            },
        )
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| EcomError::Config(format!("Invalid {} '{}': {}", key, value, e)))
}
