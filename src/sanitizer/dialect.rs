//! Supported SQL dialects and the registry that resolves them.

use std::fmt;
use std::str::FromStr;

use sea_orm::DbBackend;

use super::Sanitizer;
use crate::error::{Result, SanitizerError};

/// SQL dialect a [`Sanitizer`] is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Mysql,
    Postgres,
    SqlServer,
    Sqlite,
}

impl Dialect {
    /// Every supported dialect.
    pub const ALL: [Dialect; 4] = [
        Dialect::Mysql,
        Dialect::Postgres,
        Dialect::SqlServer,
        Dialect::Sqlite,
    ];

    /// Registry identifier for this dialect.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Mysql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::SqlServer => "sql_server",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// Value for the OpenTelemetry `db.system` attribute.
    pub fn db_system(&self) -> &'static str {
        match self {
            Dialect::Mysql => "mysql",
            Dialect::Postgres => "postgresql",
            Dialect::SqlServer => "mssql",
            Dialect::Sqlite => "sqlite",
        }
    }

    /// Map a database adapter identifier (as found in connection URLs and
    /// driver configuration) to its dialect.
    pub fn from_adapter_name(adapter: &str) -> Result<Self> {
        match adapter.to_ascii_lowercase().as_str() {
            "mysql" | "mysql2" | "trilogy" | "mariadb" => Ok(Dialect::Mysql),
            "postgres" | "postgresql" | "postgis" => Ok(Dialect::Postgres),
            "sql_server" | "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            _ => Err(SanitizerError::UnknownAdapter {
                adapter: adapter.to_string(),
            }),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = SanitizerError;

    /// Accepts exactly the registry identifiers returned by [`Dialect::as_str`].
    fn from_str(name: &str) -> Result<Self> {
        Dialect::ALL
            .into_iter()
            .find(|dialect| dialect.as_str() == name)
            .ok_or_else(|| SanitizerError::UnknownDialect {
                name: name.to_string(),
            })
    }
}

impl From<DbBackend> for Dialect {
    fn from(backend: DbBackend) -> Self {
        match backend {
            DbBackend::MySql => Dialect::Mysql,
            DbBackend::Postgres => Dialect::Postgres,
            DbBackend::Sqlite => Dialect::Sqlite,
        }
    }
}

/// Build the sanitizer registered under `name`.
///
/// Call this once during setup; an unknown name is reported here and never
/// while queries are running.
///
/// ```rust
/// let sanitizer = sea_orm_sql_tracing::resolve("postgres").unwrap();
/// assert_eq!(sanitizer.sanitize("SELECT * FROM t WHERE id = $1"), "SELECT * FROM t WHERE id = ?");
///
/// assert!(sea_orm_sql_tracing::resolve("oracle").is_err());
/// ```
pub fn resolve(name: &str) -> Result<Sanitizer> {
    let dialect: Dialect = name.parse()?;
    tracing::debug!(dialect = %dialect, "Resolved SQL sanitizer");
    Ok(Sanitizer::new(dialect))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_dialects() {
        for dialect in Dialect::ALL {
            let sanitizer = resolve(dialect.as_str()).unwrap();
            assert_eq!(sanitizer.dialect(), dialect);
        }
    }

    #[test]
    fn test_resolve_unknown_dialect() {
        let err = resolve("oracle").unwrap_err();
        assert_eq!(
            err,
            SanitizerError::UnknownDialect {
                name: "oracle".to_string()
            }
        );
        assert!(err.to_string().contains("\"oracle\""));
    }

    #[test]
    fn test_registry_names_are_exact() {
        assert!("Postgres".parse::<Dialect>().is_err());
        assert!("postgresql".parse::<Dialect>().is_err());
        assert_eq!("sql_server".parse::<Dialect>(), Ok(Dialect::SqlServer));
    }

    #[test]
    fn test_from_adapter_name() {
        assert_eq!(Dialect::from_adapter_name("mysql2"), Ok(Dialect::Mysql));
        assert_eq!(Dialect::from_adapter_name("PostgreSQL"), Ok(Dialect::Postgres));
        assert_eq!(Dialect::from_adapter_name("sqlserver"), Ok(Dialect::SqlServer));
        assert_eq!(Dialect::from_adapter_name("sqlite3"), Ok(Dialect::Sqlite));
        assert!(matches!(
            Dialect::from_adapter_name("oracle_enhanced"),
            Err(SanitizerError::UnknownAdapter { .. })
        ));
    }

    #[test]
    fn test_from_db_backend() {
        assert_eq!(Dialect::from(DbBackend::Postgres), Dialect::Postgres);
        assert_eq!(Dialect::from(DbBackend::MySql), Dialect::Mysql);
        assert_eq!(Dialect::from(DbBackend::Sqlite), Dialect::Sqlite);
    }

    #[test]
    fn test_display_round_trips_registry_name() {
        assert_eq!(Dialect::SqlServer.to_string(), "sql_server");
    }
}
