//! CLI entry point for the school accessibility dashboard.
//!
//! Loads the census snapshot once, then renders the dashboard view, lists
//! the dropdown options, or exports the per-indicator table.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use school_access::aggregate::Filters;
use school_access::config::DbConfig;
use school_access::dashboard::Dashboard;
use school_access::dataset::Dataset;
use school_access::output::{export_indicator_table, print_pretty, write_json};
use school_access::record::SchoolType;
use school_access::source::{CsvClient, PostgresClient, load_dataset, load_query};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "school_access")]
#[command(about = "Accessibility dashboard for the 2023 Brazilian school census", long_about = None)]
struct Cli {
    /// Read records from a CSV export instead of the census database
    #[arg(long, global = true, value_name = "PATH")]
    csv: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// State abbreviation (e.g. "DF")
    #[arg(long)]
    state: Option<String>,

    /// Region name (e.g. "Centro-Oeste")
    #[arg(long)]
    region: Option<String>,

    /// School dependency type: "Pública" or "Privada"
    #[arg(long)]
    dependency: Option<SchoolType>,
}

impl From<FilterArgs> for Filters {
    fn from(args: FilterArgs) -> Self {
        Filters {
            state: args.state,
            region: args.region,
            school_type: args.dependency,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the counters and chart descriptions as JSON
    Render {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print the dropdown options as JSON
    Options,
    /// Write the per-indicator table to a CSV file
    Export {
        /// CSV file to write
        #[arg(short, long, default_value = "indicadores.csv")]
        output: String,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();

    let dashboard = Dashboard::new(load(cli.csv.as_deref()).await?);

    match cli.command {
        Commands::Render { filters } => {
            let view = dashboard.render(&filters.into());
            print_pretty(&view);
            write_json(std::io::stdout().lock(), &view)?;
        }
        Commands::Options => {
            write_json(std::io::stdout().lock(), &dashboard.options())?;
        }
        Commands::Export { output, filters } => {
            let rows = dashboard.indicator_table(&filters.into());
            export_indicator_table(&output, &rows)?;
            info!(output = %output, "Indicator table written");
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/school_access.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("school_access.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Loads the snapshot from `csv` when given, otherwise from the database
/// configured in the environment. Load failures give an empty dataset.
async fn load(csv: Option<&str>) -> Result<Dataset> {
    let dataset = match csv {
        Some(path) => {
            info!(path, "Loading records from CSV");
            load_dataset(&CsvClient::new(path), "").await
        }
        None => {
            let config = DbConfig::from_env()?;
            info!(db = %config, "Loading records from database");
            let query = load_query(&config.schema, &config.table);
            load_dataset(&PostgresClient::new(config), &query).await
        }
    };

    Ok(dataset)
}
