use async_trait::async_trait;

use crate::error::LoadError;
use crate::record::RawSchoolRow;

/// Executes a query against a tabular store and returns its rows.
#[async_trait]
pub trait QueryClient: Send + Sync {
    async fn execute(&self, query: &str) -> Result<Vec<RawSchoolRow>, LoadError>;
}
