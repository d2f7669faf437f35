//! Database connection settings read from the environment.

use anyhow::{Context, Result};
use std::fmt;

pub const DEFAULT_SCHEMA: &str = "CENSO_FILTRADO_EDUCAÇÃO";
pub const DEFAULT_TABLE: &str = "arquivo_filtrado";

/// Connection parameters for the census database.
///
/// Read from `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT`, `DB_NAME`,
/// `DB_SCHEMA` and `DB_TABLE`. The schema is also set as the session
/// `search_path`.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub schema: String,
    pub table: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            port: 5432,
            dbname: "postgres".to_string(),
            schema: DEFAULT_SCHEMA.to_string(),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl DbConfig {
    /// Loads the config from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the config through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str, default: String| lookup(key).unwrap_or(default);

        let port = match lookup("DB_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DB_PORT is not a valid port: '{raw}'"))?,
            None => defaults.port,
        };

        Ok(Self {
            user: get("DB_USER", defaults.user),
            password: get("DB_PASSWORD", defaults.password),
            host: get("DB_HOST", defaults.host),
            port,
            dbname: get("DB_NAME", defaults.dbname),
            schema: get("DB_SCHEMA", defaults.schema),
            table: get("DB_TABLE", defaults.table),
        })
    }

    /// Builds the driver config, including the `search_path` session option.
    pub fn pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .user(&self.user)
            .password(&self.password)
            .host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .options(&format!("-csearch_path={}", self.schema));
        config
    }
}

impl fmt::Display for DbConfig {
    /// Connection URL with the password redacted, for logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "postgresql://{}:***@{}:{}/{} (search_path={})",
            self.user, self.host, self.port, self.dbname, self.schema
        )
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("schema", &self.schema)
            .field("table", &self.table)
            .finish()
    }
}
