//! Configuration for tracing behavior.

use std::time::Duration;

use crate::error::Result;
use crate::sanitizer::Dialect;

/// Configuration options for database tracing.
///
/// # Example
///
/// ```rust
/// use sea_orm_sql_tracing::TracingConfig;
/// use std::time::Duration;
///
/// let config = TracingConfig::default()
///     .with_dialect_name("postgres")?
///     .with_peer_address("postgresql", Some("app"), Some("db.internal"), "orders")
///     .with_slow_query_threshold(Duration::from_millis(100));
/// # Ok::<(), sea_orm_sql_tracing::SanitizerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Whether to record the SQL statement on spans.
    /// Default: `true`
    pub log_statements: bool,

    /// Whether recorded statements are sanitized first. `false` records the
    /// raw statement (pass-through mode).
    /// Default: `true`
    pub sanitize_statements: bool,

    /// Dialect used for sanitization. When `None` it is derived from the
    /// connection's backend.
    /// Default: `None`
    pub dialect: Option<Dialect>,

    /// Threshold for logging slow queries at WARN level.
    /// Default: 500ms
    pub slow_query_threshold: Duration,

    /// Whether to record the number of rows affected/returned.
    /// Default: `true`
    pub record_row_counts: bool,

    /// Database name recorded as `db.instance`.
    /// Default: `None`
    pub database_name: Option<String>,

    /// Connection address recorded as `peer.address`, e.g. `postgresql://app@db.internal/orders`.
    /// Default: `None`
    pub peer_address: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_statements: true,
            sanitize_statements: true,
            dialect: None,
            slow_query_threshold: Duration::from_millis(500),
            record_row_counts: true,
            database_name: None,
            peer_address: None,
        }
    }
}

impl TracingConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable SQL statement recording in spans.
    pub fn with_statement_logging(mut self, enabled: bool) -> Self {
        self.log_statements = enabled;
        self
    }

    /// Enable or disable statement sanitization.
    ///
    /// **Security Warning**: With sanitization off, literals and bound values
    /// embedded in the SQL text are recorded verbatim.
    pub fn with_sanitization(mut self, enabled: bool) -> Self {
        self.sanitize_statements = enabled;
        self
    }

    /// Sanitize with `dialect` instead of the connection backend's dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Like [`with_dialect`](Self::with_dialect), looking the dialect up by its
    /// registry name (`mysql`, `postgres`, `sql_server` or `sqlite`).
    pub fn with_dialect_name(self, name: &str) -> Result<Self> {
        Ok(self.with_dialect(name.parse()?))
    }

    /// Like [`with_dialect`](Self::with_dialect), deriving the dialect from a
    /// database adapter identifier such as `postgresql` or `mysql2`.
    pub fn with_adapter(self, adapter: &str) -> Result<Self> {
        Ok(self.with_dialect(Dialect::from_adapter_name(adapter)?))
    }

    /// Set the threshold for slow query warnings.
    ///
    /// Queries taking longer than this duration will be logged at WARN level
    /// with the `slow_query` field set to `true`.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = threshold;
        self
    }

    /// Enable or disable row count recording.
    pub fn with_row_count_recording(mut self, enabled: bool) -> Self {
        self.record_row_counts = enabled;
        self
    }

    /// Set a database name to include in spans.
    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = Some(name.into());
        self
    }

    /// Set `peer.address` from connection details, formatted as
    /// `adapter://username@host/database`. Missing parts are left out.
    ///
    /// Also sets the database name if none has been set.
    pub fn with_peer_address(
        mut self,
        adapter: &str,
        username: Option<&str>,
        host: Option<&str>,
        database: &str,
    ) -> Self {
        let mut address = format!("{adapter}://");
        if let Some(username) = username {
            address.push_str(username);
        }
        if let Some(host) = host {
            address.push('@');
            address.push_str(host);
        }
        address.push('/');
        address.push_str(database);

        self.peer_address = Some(address);
        if self.database_name.is_none() {
            self.database_name = Some(database.to_string());
        }
        self
    }

    /// Create a development-friendly configuration that records raw SQL.
    ///
    /// **Warning**: Do not use in production as statements are not sanitized.
    pub fn development() -> Self {
        Self {
            sanitize_statements: false,
            slow_query_threshold: Duration::from_millis(100),
            ..Self::default()
        }
    }

    /// Create a production-safe configuration: sanitized statements only.
    pub fn production() -> Self {
        Self {
            slow_query_threshold: Duration::from_secs(1),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SanitizerError;

    #[test]
    fn test_defaults_sanitize() {
        let config = TracingConfig::default();
        assert!(config.log_statements);
        assert!(config.sanitize_statements);
        assert_eq!(config.dialect, None);
    }

    #[test]
    fn test_dialect_name() {
        let config = TracingConfig::new().with_dialect_name("sql_server").unwrap();
        assert_eq!(config.dialect, Some(Dialect::SqlServer));

        let err = TracingConfig::new().with_dialect_name("db2").unwrap_err();
        assert!(matches!(err, SanitizerError::UnknownDialect { .. }));
    }

    #[test]
    fn test_adapter() {
        let config = TracingConfig::new().with_adapter("mysql2").unwrap();
        assert_eq!(config.dialect, Some(Dialect::Mysql));
        assert!(TracingConfig::new().with_adapter("oracle").is_err());
    }

    #[test]
    fn test_peer_address() {
        let config = TracingConfig::new().with_peer_address(
            "postgresql",
            Some("app"),
            Some("db.internal"),
            "orders",
        );
        assert_eq!(
            config.peer_address.as_deref(),
            Some("postgresql://app@db.internal/orders")
        );
        assert_eq!(config.database_name.as_deref(), Some("orders"));
    }

    #[test]
    fn test_peer_address_without_credentials() {
        let config = TracingConfig::new()
            .with_database_name("primary")
            .with_peer_address("sqlite3", None, None, "db/development.sqlite3");
        assert_eq!(
            config.peer_address.as_deref(),
            Some("sqlite3:///db/development.sqlite3")
        );
        assert_eq!(config.database_name.as_deref(), Some("primary"));
    }

    #[test]
    fn test_development_config() {
        let config = TracingConfig::development();
        assert!(config.log_statements);
        assert!(!config.sanitize_statements);
    }

    #[test]
    fn test_production_config() {
        let config = TracingConfig::production();
        assert!(config.sanitize_statements);
        assert_eq!(config.slow_query_threshold, Duration::from_secs(1));
    }
}
