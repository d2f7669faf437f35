//! Filtering and aggregation over school records.
//!
//! Filters narrow the loaded snapshot to a view; the aggregation functions
//! turn a view into the counters and per-indicator tables the dashboard
//! charts are built from. None of them fail: empty input yields zeroed or
//! empty results.

pub mod aggregate;
pub mod filter;
pub mod types;
pub mod utility;

pub use aggregate::{indicator_coverage, indicator_totals, internet_distribution, summarize};
pub use filter::filter;
pub use types::{
    Filters, IndicatorCoverage, IndicatorTotal, InternetAccess, InternetDistribution, Summary,
};
