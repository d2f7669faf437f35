//! Output formatting and persistence for dashboard views.
//!
//! Supports pretty-printing, JSON serialization, and CSV export of the
//! per-indicator table.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::dashboard::{DashboardView, IndicatorRow};
use csv::WriterBuilder;
use std::fs::File;

/// Logs a view using Rust's debug pretty-print format.
pub fn print_pretty(view: &DashboardView) {
    debug!("{:#?}", view);
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes the per-indicator table to a CSV file, replacing any existing file.
pub fn export_indicator_table(path: &str, rows: &[IndicatorRow]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing indicator CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
