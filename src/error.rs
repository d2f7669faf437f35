use thiserror::Error;

/// Why loading the census table failed.
///
/// Both variants are handled the same way by [`crate::source::load_dataset`]:
/// the failure is logged and the dashboard runs on an empty dataset. An empty
/// but successful result is not an error.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The store was unreachable or the query failed.
    #[error("Data source failure: {0}")]
    Source(String),

    /// A column was missing or had a type that cannot be decoded.
    #[error("Schema mismatch: {0}")]
    Schema(String),
}

impl From<tokio_postgres::Error> for LoadError {
    fn from(err: tokio_postgres::Error) -> Self {
        LoadError::Source(err.to_string())
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Source(err.to_string())
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            LoadError::Source(err.to_string())
        } else {
            LoadError::Schema(err.to_string())
        }
    }
}
