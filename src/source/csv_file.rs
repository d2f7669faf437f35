use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::client::QueryClient;
use super::expected_columns;
use crate::error::LoadError;
use crate::record::RawSchoolRow;

/// A [`QueryClient`] backed by a CSV export of the census table.
///
/// The file must carry a header row with the query aliases (`state`,
/// `region`, `dependency`, ...). The query text is ignored; operational
/// filtering is applied by the caller.
pub struct CsvClient {
    path: PathBuf,
}

impl CsvClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QueryClient for CsvClient {
    async fn execute(&self, _query: &str) -> Result<Vec<RawSchoolRow>, LoadError> {
        debug!(path = %self.path.display(), "Reading census CSV");

        let mut rdr = csv::Reader::from_path(&self.path)?;

        let headers = rdr.headers()?.clone();
        let missing: Vec<&str> = expected_columns()
            .into_iter()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::Schema(format!(
                "CSV is missing columns: {}",
                missing.join(", ")
            )));
        }

        let mut rows = Vec::new();
        for result in rdr.deserialize() {
            let record: RawSchoolRow = result?;
            rows.push(record);
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::load_dataset;
    use std::env;
    use std::fs;

    const HEADER: &str = "state,region,dependency,internet,corrimao,elevador,pisos_tateis,vao_livre,rampas,sinal_sonoro,sinal_tatil,sinal_visual,operational_status";

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[tokio::test]
    async fn test_reads_rows_with_missing_values() {
        let path = temp_path("school_access_test_read.csv");
        fs::write(
            &path,
            format!("{HEADER}\nDF,Centro-Oeste,2,1,1,1,1,1,1,1,1,1,1\nSP,Sudeste,4,,,,,,,,,,1\n"),
        )
        .unwrap();

        let rows = CsvClient::new(&path).execute("").await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].state.as_deref(), Some("DF"));
        assert_eq!(rows[0].sinal_visual, Some(1));
        assert_eq!(rows[1].internet, None);
        assert_eq!(rows[1].rampas, None);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_reads_float_and_bool_codes() {
        let path = temp_path("school_access_test_float_codes.csv");
        fs::write(
            &path,
            format!(
                "{HEADER}\nDF,Centro-Oeste,2.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1\n\
                 SP,Sudeste,4.0,false,true,false,,0.0,True,0,0,0,1.0\n\
                 RJ,Sudeste,2,NaN,0,0,0,0,0,0,0,0,1\n"
            ),
        )
        .unwrap();

        let rows = CsvClient::new(&path).execute("").await.unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].dependency, Some(2));
        assert_eq!(rows[0].internet, Some(1));
        assert_eq!(rows[0].sinal_visual, Some(1));
        assert_eq!(rows[1].dependency, Some(4));
        assert_eq!(rows[1].internet, Some(0));
        assert_eq!(rows[1].corrimao, Some(1));
        assert_eq!(rows[1].pisos_tateis, None);
        assert_eq!(rows[1].rampas, Some(1));
        assert_eq!(rows[1].operational_status, Some(1));
        assert_eq!(rows[2].internet, None);

        let dataset = load_dataset(&CsvClient::new(&path), "").await;
        assert_eq!(dataset.len(), 3);
        assert!(dataset.records()[0].has_all_accessibility);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_unparsable_code_is_schema_error() {
        let path = temp_path("school_access_test_bad_code.csv");
        fs::write(&path, format!("{HEADER}\nDF,Centro-Oeste,sim,1,1,1,1,1,1,1,1,1,1\n")).unwrap();

        let result = CsvClient::new(&path).execute("").await;
        assert!(matches!(result, Err(LoadError::Schema(_))));

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_column_is_schema_error() {
        let path = temp_path("school_access_test_missing.csv");
        fs::write(&path, "state,region\nDF,Centro-Oeste\n").unwrap();

        let result = CsvClient::new(&path).execute("").await;
        assert!(matches!(result, Err(LoadError::Schema(_))));

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_source_error() {
        let result = CsvClient::new(temp_path("school_access_does_not_exist.csv"))
            .execute("")
            .await;
        assert!(matches!(result, Err(LoadError::Source(_))));
    }
}
