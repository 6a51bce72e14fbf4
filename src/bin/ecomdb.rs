//! ecomdb CLI - synthetic e-commerce data generation and SQLite ingestion
//!
//! Without a subcommand the tool runs `ingest` with default settings.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use ecomdb::{Dataset, EcomError, PipelineConfig};

#[derive(Parser)]
#[command(name = "ecomdb")]
#[command(version, about = "Generate e-commerce CSV data and load it into SQLite", long_about = None)]
struct Cli {
    /// Path to a YAML config file (default: ecomdb.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the five CSV files from a fixed seed
    Generate {
        /// Directory to write the CSV files into
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Load the CSV files into SQLite and print the order report
    Ingest {
        /// Directory holding the CSV files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Where to write the analytic query text
        #[arg(long)]
        query_file: Option<PathBuf>,

        /// Number of report rows to print
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    // Load environment variables before reading ECOMDB_* overrides
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = PipelineConfig::load(cli.config.as_deref()).and_then(|config| {
        match cli.command {
            Some(Commands::Generate { out_dir, seed }) => generate(config, out_dir, seed),
            Some(Commands::Ingest {
                data_dir,
                database,
                query_file,
                limit,
            }) => ingest(config, data_dir, database, query_file, limit),
            None => ingest(config, None, None, None, None),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Generate the dataset and write it as CSV
fn generate(
    mut config: PipelineConfig,
    out_dir: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<(), EcomError> {
    if let Some(seed) = seed {
        config.generator.seed = seed;
    }
    let out_dir = out_dir.unwrap_or(config.data_dir);

    let dataset = Dataset::generate(&config.generator)?;
    for problem in dataset.check_integrity() {
        tracing::warn!("{}", problem);
    }

    let files = dataset.write_csv(&out_dir)?;
    println!("CSV files generated: {}", files.join(", "));
    Ok(())
}

/// Load the CSV files and print the report
fn ingest(
    mut config: PipelineConfig,
    data_dir: Option<PathBuf>,
    database: Option<PathBuf>,
    query_file: Option<PathBuf>,
    limit: Option<usize>,
) -> Result<(), EcomError> {
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    if let Some(path) = database {
        config.database_path = path;
    }
    if let Some(path) = query_file {
        config.query_file = path;
    }
    if let Some(limit) = limit {
        config.preview_rows = limit;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    ecomdb::ingest::run(&config, &mut out)
}
