use async_trait::async_trait;
use std::time::Duration;
use tokio_postgres::types::Type;
use tokio_postgres::{NoTls, Row};
use tracing::{debug, error};

use super::client::QueryClient;
use crate::config::DbConfig;
use crate::error::LoadError;
use crate::record::{CodedValue, Indicator, RawSchoolRow};

/// A [`QueryClient`] that opens one connection per query to PostgreSQL.
pub struct PostgresClient {
    config: DbConfig,
}

impl PostgresClient {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }
}

#[async_trait]
impl QueryClient for PostgresClient {
    async fn execute(&self, query: &str) -> Result<Vec<RawSchoolRow>, LoadError> {
        debug!(db = %self.config, "Connecting to census database");

        let mut pg = self.config.pg_config();
        pg.connect_timeout(Duration::from_secs(10));
        let (client, connection) = pg.connect(NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "Postgres connection error");
            }
        });

        let rows = client.query(query, &[]).await?;
        debug!(rows = rows.len(), "Query returned");

        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &Row) -> Result<RawSchoolRow, LoadError> {
    let mut raw = RawSchoolRow {
        state: text_column(row, "state")?,
        region: text_column(row, "region")?,
        dependency: int_column(row, "dependency")?,
        internet: int_column(row, "internet")?,
        operational_status: int_column(row, "operational_status")?,
        ..Default::default()
    };

    for indicator in Indicator::ALL {
        raw.set_indicator(indicator, int_column(row, indicator.alias())?);
    }

    Ok(raw)
}

fn column_index(row: &Row, name: &str) -> Result<usize, LoadError> {
    find_column(row.columns().iter().map(|c| c.name()), name)
}

fn find_column<'a>(
    mut names: impl Iterator<Item = &'a str>,
    name: &str,
) -> Result<usize, LoadError> {
    names
        .position(|n| n == name)
        .ok_or_else(|| LoadError::Schema(format!("column '{name}' missing from result")))
}

fn text_column(row: &Row, name: &str) -> Result<Option<String>, LoadError> {
    let idx = column_index(row, name)?;
    row.try_get::<_, Option<String>>(idx)
        .map_err(|e| LoadError::Schema(format!("column '{name}': {e}")))
}

/// Wire types a coded column may arrive as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodedKind {
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Bool,
}

fn coded_kind(ty: &Type, name: &str) -> Result<CodedKind, LoadError> {
    let kind = if *ty == Type::INT2 {
        CodedKind::Int2
    } else if *ty == Type::INT4 {
        CodedKind::Int4
    } else if *ty == Type::INT8 {
        CodedKind::Int8
    } else if *ty == Type::FLOAT4 {
        CodedKind::Float4
    } else if *ty == Type::FLOAT8 {
        CodedKind::Float8
    } else if *ty == Type::BOOL {
        CodedKind::Bool
    } else {
        return Err(LoadError::Schema(format!(
            "column '{name}' has unsupported type {ty}"
        )));
    };
    Ok(kind)
}

/// Reads a coded column and converts it with [`CodedValue::to_code`].
fn int_column(row: &Row, name: &str) -> Result<Option<i64>, LoadError> {
    let idx = column_index(row, name)?;
    let kind = coded_kind(row.columns()[idx].type_(), name)?;
    let schema_err = |e: tokio_postgres::Error| LoadError::Schema(format!("column '{name}': {e}"));

    let value = match kind {
        CodedKind::Int2 => row
            .try_get::<_, Option<i16>>(idx)
            .map_err(schema_err)?
            .map(|v| CodedValue::Int(i64::from(v))),
        CodedKind::Int4 => row
            .try_get::<_, Option<i32>>(idx)
            .map_err(schema_err)?
            .map(|v| CodedValue::Int(i64::from(v))),
        CodedKind::Int8 => row
            .try_get::<_, Option<i64>>(idx)
            .map_err(schema_err)?
            .map(CodedValue::Int),
        CodedKind::Float4 => row
            .try_get::<_, Option<f32>>(idx)
            .map_err(schema_err)?
            .map(|v| CodedValue::Float(f64::from(v))),
        CodedKind::Float8 => row
            .try_get::<_, Option<f64>>(idx)
            .map_err(schema_err)?
            .map(CodedValue::Float),
        CodedKind::Bool => row
            .try_get::<_, Option<bool>>(idx)
            .map_err(schema_err)?
            .map(CodedValue::Bool),
    };

    Ok(value.and_then(CodedValue::to_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{load_dataset, load_query};

    #[test]
    fn test_coded_kind_accepts_numeric_and_bool_types() {
        let cases = [
            (Type::INT2, CodedKind::Int2),
            (Type::INT4, CodedKind::Int4),
            (Type::INT8, CodedKind::Int8),
            (Type::FLOAT4, CodedKind::Float4),
            (Type::FLOAT8, CodedKind::Float8),
            (Type::BOOL, CodedKind::Bool),
        ];
        for (ty, kind) in cases {
            assert_eq!(coded_kind(&ty, "internet").unwrap(), kind);
        }
    }

    #[test]
    fn test_coded_kind_rejects_other_types() {
        for ty in [Type::TEXT, Type::NUMERIC, Type::DATE] {
            let result = coded_kind(&ty, "dependency");
            assert!(matches!(result, Err(LoadError::Schema(_))));
        }
    }

    #[test]
    fn test_find_column() {
        let names = ["state", "region", "internet"];
        assert_eq!(find_column(names.iter().copied(), "internet").unwrap(), 2);

        let missing = find_column(names.iter().copied(), "rampas");
        assert!(matches!(missing, Err(LoadError::Schema(_))));
    }

    #[test]
    fn test_decoded_values_to_code() {
        assert_eq!(CodedValue::Int(i64::from(4i16)).to_code(), Some(4));
        assert_eq!(CodedValue::Float(f64::from(1.0f32)).to_code(), Some(1));
        assert_eq!(CodedValue::Float(f64::from(f32::NAN)).to_code(), None);
        assert_eq!(CodedValue::Bool(true).to_code(), Some(1));
        let null: Option<CodedValue> = None;
        assert_eq!(null.and_then(CodedValue::to_code), None);
    }

    #[tokio::test]
    async fn test_unreachable_database_loads_empty_dataset() {
        let client = PostgresClient::new(DbConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..Default::default()
        });

        let query = load_query(&client.config().schema, &client.config().table);
        let dataset = load_dataset(&client, &query).await;

        assert!(dataset.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_database_is_source_error() {
        let client = PostgresClient::new(DbConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..Default::default()
        });

        let result = client.execute("SELECT 1").await;
        assert!(matches!(result, Err(LoadError::Source(_))));
    }
}
