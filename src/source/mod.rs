//! Loading the census table into a [`Dataset`].
//!
//! [`QueryClient`] is the seam to the store. [`PostgresClient`] talks to the
//! census database; [`CsvClient`] reads an exported table from disk.
//! [`load_dataset`] never fails: errors are logged and produce an empty
//! dataset.

mod client;
mod csv_file;
mod postgres;

pub use client::QueryClient;
pub use csv_file::CsvClient;
pub use postgres::PostgresClient;

use tracing::{debug, error, info, warn};

use crate::dataset::Dataset;
use crate::error::LoadError;
use crate::record::{Indicator, OPERATIONAL, RawSchoolRow};

/// Non-indicator columns selected by the load query: `(source, alias)`.
const BASE_COLUMNS: [(&str, &str); 4] = [
    ("SG_UF", "state"),
    ("NO_REGIAO", "region"),
    ("TP_DEPENDENCIA", "dependency"),
    ("IN_INTERNET", "internet"),
];

const STATUS_COLUMN: (&str, &str) = ("TP_SITUACAO_FUNCIONAMENTO", "operational_status");

/// Every alias a source must provide, in query order.
pub fn expected_columns() -> Vec<&'static str> {
    BASE_COLUMNS
        .iter()
        .map(|&(_, alias)| alias)
        .chain(Indicator::ALL.iter().map(|i| i.alias()))
        .chain(std::iter::once(STATUS_COLUMN.1))
        .collect()
}

/// Builds the query selecting operating schools from `"schema"."table"`.
pub fn load_query(schema: &str, table: &str) -> String {
    let columns: Vec<String> = BASE_COLUMNS
        .iter()
        .copied()
        .chain(Indicator::ALL.iter().map(|i| (i.column(), i.alias())))
        .chain(std::iter::once(STATUS_COLUMN))
        .map(|(source, alias)| format!("e.{} AS {}", quote_ident(source), alias))
        .collect();

    format!(
        "SELECT {} FROM {}.{} e WHERE e.{} = {}",
        columns.join(", "),
        quote_ident(schema),
        quote_ident(table),
        quote_ident(STATUS_COLUMN.0),
        OPERATIONAL
    )
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Runs `query` and returns the raw rows, restricted to operating schools.
pub async fn fetch_rows<C: QueryClient>(
    client: &C,
    query: &str,
) -> Result<Vec<RawSchoolRow>, LoadError> {
    let mut rows = client.execute(query).await?;
    let before = rows.len();
    rows.retain(RawSchoolRow::is_operational);

    if rows.len() < before {
        debug!(dropped = before - rows.len(), "Dropped non-operational rows");
    }

    Ok(rows)
}

/// Loads the dataset snapshot, logging and swallowing any failure.
#[tracing::instrument(skip(client, query))]
pub async fn load_dataset<C: QueryClient>(client: &C, query: &str) -> Dataset {
    match fetch_rows(client, query).await {
        Ok(rows) if rows.is_empty() => {
            warn!("Query returned no rows, dashboard will be empty");
            Dataset::default()
        }
        Ok(rows) => {
            let dataset = Dataset::from_rows(&rows);
            info!(rows = dataset.len(), "Dataset loaded");
            dataset
        }
        Err(e) => {
            error!(error = %e, "Failed to load dataset");
            Dataset::default()
        }
    }
}
