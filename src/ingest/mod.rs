//! Ingestion pipeline: CSV files in, SQLite tables and an order report out.
//!
//! The load phase runs on one connection inside one transaction: every table
//! is dropped, recreated and refilled from its CSV, then committed. The query
//! phase opens a second, read-only connection. Both connections are closed
//! when they go out of scope, on success and on error alike.

pub mod csv_loader;

pub use csv_loader::{load_csv_rows, read_csv_rows};

use diesel::prelude::*;
use std::io::Write;

use crate::analytics::{order_summaries, write_query_file, OrderSummary};
use crate::config::PipelineConfig;
use crate::db::{drop_tables, ensure_tables, insert_records, table_specs};
use crate::entity::FieldValue;
use crate::error::{EcomError, Result};
use crate::report::format_table;

/// Printed once the load phase has committed
pub const LOAD_COMPLETE_MESSAGE: &str = "SQLite ingestion complete.";

/// Rows written per table by one load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub tables: Vec<(String, usize)>,
}

impl LoadReport {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }

    pub fn rows_for(&self, table: &str) -> Option<usize> {
        self.tables
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, rows)| *rows)
    }
}

/// Drop, recreate and refill every table from the CSV files.
///
/// A missing or malformed CSV aborts the load; nothing from this run is
/// committed in that case.
pub fn load(config: &PipelineConfig) -> Result<LoadReport> {
    let db = config.database();
    tracing::info!(database = %db.path().display(), "Starting load phase");

    let mut conn = db.connect()?;
    let report = conn.transaction::<_, EcomError, _>(|conn| {
        drop_tables(conn)?;
        ensure_tables(conn)?;

        let mut report = LoadReport::default();
        for spec in table_specs() {
            let path = config.csv_path(spec.name);
            let rows = load_csv_rows(&path)?;
            let written = insert_records(conn, spec.name, &rows)?;

            tracing::info!(table = spec.name, rows = written, "Loaded {}", path.display());
            report.tables.push((spec.name.to_string(), written));
        }
        Ok(report)
    })?;

    tracing::info!(rows = report.total_rows(), "Load phase committed");
    Ok(report)
}

/// Run the analytic query on a read-only connection
pub fn query(config: &PipelineConfig) -> Result<Vec<OrderSummary>> {
    let mut conn = config.database().connect_read_only()?;
    let rows = order_summaries(&mut conn, config.preview_rows)?;
    tracing::info!(rows = rows.len(), "Query phase finished");
    Ok(rows)
}

/// Print report rows as an aligned text table
pub fn render<W: Write>(rows: &[OrderSummary], out: &mut W) -> Result<()> {
    let cells: Vec<Vec<FieldValue>> = rows.iter().map(OrderSummary::cells).collect();
    writeln!(out, "{}", format_table(&OrderSummary::COLUMNS, &cells))
        .map_err(|e| EcomError::io("<output>", e))
}

/// Full ingestion run: load, announce, write the query file, query, print.
pub fn run<W: Write>(config: &PipelineConfig, out: &mut W) -> Result<()> {
    load(config)?;
    writeln!(out, "{}", LOAD_COMPLETE_MESSAGE).map_err(|e| EcomError::io("<output>", e))?;

    write_query_file(&config.query_file)?;
    tracing::debug!(path = %config.query_file.display(), "Wrote query file");

    let rows = query(config)?;
    render(&rows, out)
}
