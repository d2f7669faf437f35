pub mod aggregate;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod output;
pub mod record;
pub mod source;
