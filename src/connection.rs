//! Traced database connection wrapper.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr,
    ExecResult, IsolationLevel, QueryResult, Statement, StreamTrait, TransactionError,
    TransactionTrait,
};
use tracing::{field, Instrument, Span};

use crate::config::TracingConfig;
use crate::parser::ParsedStatement;
use crate::sanitizer::{Dialect, Sanitizer};

const COMPONENT: &str = "sea-orm";
const DB_TYPE: &str = "sql";

/// A traced wrapper around SeaORM's `DatabaseConnection`.
///
/// Implements `ConnectionTrait`, `StreamTrait` and `TransactionTrait`, so it
/// can be used anywhere a `DatabaseConnection` is. Every statement runs inside
/// a `db.query` span whose `db.statement` is sanitized for the connection's
/// dialect (see [`TracingConfig::with_sanitization`]).
///
/// The sanitizer is chosen once, when the wrapper is built: the configured
/// dialect if any, otherwise the dialect of the connection's backend.
///
/// # Example
///
/// ```rust,ignore
/// use sea_orm::Database;
/// use sea_orm_sql_tracing::TracedConnection;
///
/// let db = Database::connect("postgres://localhost/mydb").await?;
/// let traced = TracedConnection::from(db);
///
/// // Recorded as: SELECT "users".* FROM "users" WHERE "users"."email" = ?
/// let user = Users::find().filter(users::Column::Email.eq("a@b.c")).one(&traced).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TracedConnection {
    inner: DatabaseConnection,
    config: Arc<TracingConfig>,
    sanitizer: Sanitizer,
}

impl TracedConnection {
    /// Create a new traced connection with the given configuration.
    pub fn new(connection: DatabaseConnection, config: TracingConfig) -> Self {
        let dialect = config
            .dialect
            .unwrap_or_else(|| Dialect::from(connection.get_database_backend()));
        tracing::debug!(
            dialect = %dialect,
            sanitize = config.sanitize_statements,
            "Tracing database connection"
        );

        Self {
            inner: connection,
            config: Arc::new(config),
            sanitizer: Sanitizer::new(dialect),
        }
    }

    /// Create a new traced connection with default configuration.
    pub fn wrap(connection: DatabaseConnection) -> Self {
        Self::new(connection, TracingConfig::default())
    }

    /// Get a reference to the underlying `DatabaseConnection`.
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }

    /// Get the tracing configuration.
    pub fn config(&self) -> &TracingConfig {
        &self.config
    }

    /// The sanitizer applied to recorded statements.
    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// Consume the wrapper and return the inner `DatabaseConnection`.
    pub fn into_inner(self) -> DatabaseConnection {
        self.inner
    }

    /// `db.system` follows the backend, independent of the redaction dialect.
    fn db_system(&self) -> &'static str {
        Dialect::from(self.inner.get_database_backend()).db_system()
    }

    /// Create the span for one statement.
    fn create_span(&self, sql: &str) -> Span {
        let sanitizer = self.config.sanitize_statements.then_some(&self.sanitizer);
        let parsed = ParsedStatement::parse(sql, sanitizer);

        let span = tracing::info_span!(
            "db.query",
            otel.name = %parsed.span_name(),
            otel.kind = "client",
            component = COMPONENT,
            span.kind = "client",
            "db.type" = DB_TYPE,
            db.system = %self.db_system(),
            db.instance = field::Empty,
            db.statement = field::Empty,
            db.query_type = field::Empty,
            db.query_category = field::Empty,
            db.rows_affected = field::Empty,
            db.duration_ms = field::Empty,
            peer.address = field::Empty,
            otel.status_code = field::Empty,
            error.message = field::Empty,
            slow_query = field::Empty,
        );

        if let Some(name) = &self.config.database_name {
            span.record("db.instance", name.as_str());
        }
        if let Some(address) = &self.config.peer_address {
            span.record("peer.address", address.as_str());
        }
        if self.config.log_statements {
            span.record("db.statement", parsed.statement.as_str());
            span.record("db.query_type", parsed.query_type.as_str());
            span.record("db.query_category", parsed.category.as_str());
        }

        span
    }

    fn transaction_span(
        &self,
        operation: &'static str,
        isolation_level: Option<IsolationLevel>,
        access_mode: Option<AccessMode>,
    ) -> Span {
        tracing::info_span!(
            "db.transaction",
            otel.name = operation,
            component = COMPONENT,
            db.system = %self.db_system(),
            db.operation = operation,
            db.transaction.isolation_level = ?isolation_level,
            db.transaction.access_mode = ?access_mode,
            otel.status_code = field::Empty,
            error.message = field::Empty,
        )
    }

    /// Run a statement future inside `span` and record its outcome.
    async fn traced<T, F>(&self, span: Span, query: F, rows: fn(&T) -> u64) -> Result<T, DbErr>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        let start = Instant::now();
        let result = query.instrument(span.clone()).await;
        let row_count = result.as_ref().ok().map(rows);
        self.record_result(&span, &result, start, row_count);
        result
    }

    /// Record the result of a database operation in the span.
    fn record_result<T>(
        &self,
        span: &Span,
        result: &Result<T, DbErr>,
        start: Instant,
        row_count: Option<u64>,
    ) {
        let elapsed = start.elapsed();
        let duration_ms = elapsed.as_millis() as i64;
        span.record("db.duration_ms", duration_ms);

        if self.config.record_row_counts {
            if let Some(count) = row_count {
                span.record("db.rows_affected", count);
            }
        }

        if elapsed > self.config.slow_query_threshold {
            span.record("slow_query", true);
            tracing::warn!(
                parent: span,
                duration_ms = duration_ms,
                threshold_ms = self.config.slow_query_threshold.as_millis() as i64,
                "Slow query detected"
            );
        }

        if let Err(e) = result {
            tracing::error!(parent: span, error = %e, "Database query failed");
        }
        record_status(span, result.as_ref().err());
    }
}

fn record_status<E: fmt::Display>(span: &Span, error: Option<E>) {
    match error {
        None => {
            span.record("otel.status_code", "OK");
        }
        Some(e) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", e.to_string().as_str());
        }
    }
}

/// Records transaction errors by their `Debug` form.
struct DebugDisplay<'a, T: fmt::Debug>(&'a T);

impl<T: fmt::Debug> fmt::Display for DebugDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<DatabaseConnection> for TracedConnection {
    fn from(connection: DatabaseConnection) -> Self {
        Self::wrap(connection)
    }
}

impl AsRef<DatabaseConnection> for TracedConnection {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.inner
    }
}

#[async_trait]
impl ConnectionTrait for TracedConnection {
    fn get_database_backend(&self) -> DbBackend {
        self.inner.get_database_backend()
    }

    async fn execute(&self, stmt: Statement) -> Result<ExecResult, DbErr> {
        let span = self.create_span(&stmt.sql);
        self.traced(span, self.inner.execute(stmt), |r: &ExecResult| {
            r.rows_affected()
        })
        .await
    }

    async fn execute_unprepared(&self, sql: &str) -> Result<ExecResult, DbErr> {
        let span = self.create_span(sql);
        self.traced(span, self.inner.execute_unprepared(sql), |r: &ExecResult| {
            r.rows_affected()
        })
        .await
    }

    async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, DbErr> {
        let span = self.create_span(&stmt.sql);
        self.traced(span, self.inner.query_one(stmt), |row: &Option<QueryResult>| {
            u64::from(row.is_some())
        })
        .await
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        let span = self.create_span(&stmt.sql);
        self.traced(span, self.inner.query_all(stmt), |rows: &Vec<QueryResult>| {
            rows.len() as u64
        })
        .await
    }

    fn support_returning(&self) -> bool {
        self.inner.support_returning()
    }

    fn is_mock_connection(&self) -> bool {
        self.inner.is_mock_connection()
    }
}

#[async_trait]
impl StreamTrait for TracedConnection {
    type Stream<'a> = <DatabaseConnection as StreamTrait>::Stream<'a>;

    fn stream<'a>(
        &'a self,
        stmt: Statement,
    ) -> Pin<Box<dyn Future<Output = Result<Self::Stream<'a>, DbErr>> + 'a + Send>> {
        let span = self.create_span(&stmt.sql);
        let start = Instant::now();

        Box::pin(async move {
            let result = self.inner.stream(stmt).instrument(span.clone()).await;
            // Rows aren't known until the stream is consumed.
            self.record_result(&span, &result, start, None);
            result
        })
    }
}

#[async_trait]
impl TransactionTrait for TracedConnection {
    async fn begin(&self) -> Result<DatabaseTransaction, DbErr> {
        let span = self.transaction_span("BEGIN", None, None);
        let result = self.inner.begin().instrument(span.clone()).await;
        record_status(&span, result.as_ref().err());
        result
    }

    async fn begin_with_config(
        &self,
        isolation_level: Option<IsolationLevel>,
        access_mode: Option<AccessMode>,
    ) -> Result<DatabaseTransaction, DbErr> {
        let span = self.transaction_span("BEGIN", isolation_level, access_mode);
        let result = self
            .inner
            .begin_with_config(isolation_level, access_mode)
            .instrument(span.clone())
            .await;
        record_status(&span, result.as_ref().err());
        result
    }

    async fn transaction<F, T, E>(&self, callback: F) -> Result<T, TransactionError<E>>
    where
        F: for<'c> FnOnce(
                &'c DatabaseTransaction,
            ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>
            + Send,
        T: Send,
        E: std::fmt::Display + std::fmt::Debug + Send,
    {
        let span = self.transaction_span("TRANSACTION", None, None);
        let result = self
            .inner
            .transaction(callback)
            .instrument(span.clone())
            .await;
        record_status(&span, result.as_ref().err().map(DebugDisplay));
        result
    }

    async fn transaction_with_config<F, T, E>(
        &self,
        callback: F,
        isolation_level: Option<IsolationLevel>,
        access_mode: Option<AccessMode>,
    ) -> Result<T, TransactionError<E>>
    where
        F: for<'c> FnOnce(
                &'c DatabaseTransaction,
            ) -> Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'c>>
            + Send,
        T: Send,
        E: std::fmt::Display + std::fmt::Debug + Send,
    {
        let span = self.transaction_span("TRANSACTION", isolation_level, access_mode);
        let result = self
            .inner
            .transaction_with_config(callback, isolation_level, access_mode)
            .instrument(span.clone())
            .await;
        record_status(&span, result.as_ref().err().map(DebugDisplay));
        result
    }
}

/// Extension trait for easy wrapping of database connections.
pub trait TracingExt {
    /// Wrap this connection with tracing instrumentation.
    fn with_tracing(self) -> TracedConnection;

    /// Wrap this connection with custom tracing configuration.
    fn with_tracing_config(self, config: TracingConfig) -> TracedConnection;
}

impl TracingExt for DatabaseConnection {
    fn with_tracing(self) -> TracedConnection {
        TracedConnection::wrap(self)
    }

    fn with_tracing_config(self, config: TracingConfig) -> TracedConnection {
        TracedConnection::new(self, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    /// Collects every string value recorded under one field name.
    #[derive(Clone)]
    struct FieldCapture {
        field: &'static str,
        values: Arc<Mutex<Vec<String>>>,
    }

    impl FieldCapture {
        fn new(field: &'static str) -> Self {
            Self {
                field,
                values: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn values(&self) -> Vec<String> {
            self.values.lock().unwrap().clone()
        }
    }

    impl Visit for FieldCapture {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == self.field {
                self.values.lock().unwrap().push(value.to_string());
            }
        }

        fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
    }

    impl<S: Subscriber> Layer<S> for FieldCapture {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            attrs.record(&mut self.clone());
        }

        fn on_record(&self, _id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
            values.record(&mut self.clone());
        }
    }

    fn mock_connection(backend: DatabaseBackend) -> DatabaseConnection {
        MockDatabase::new(backend)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection()
    }

    async fn recorded_statements(config: TracingConfig, sql: &str) -> Vec<String> {
        recorded_field("db.statement", config, sql).await
    }

    async fn recorded_field(field: &'static str, config: TracingConfig, sql: &str) -> Vec<String> {
        let capture = FieldCapture::new(field);
        let subscriber = Registry::default().with(capture.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let traced = TracedConnection::new(mock_connection(DatabaseBackend::Postgres), config);
        let result = traced
            .execute(Statement::from_string(DatabaseBackend::Postgres, sql))
            .await
            .unwrap();
        assert_eq!(result.rows_affected(), 3);

        capture.values()
    }

    #[test]
    fn test_dialect_follows_backend() {
        let traced = TracedConnection::from(mock_connection(DatabaseBackend::MySql));
        assert_eq!(traced.sanitizer().dialect(), Dialect::Mysql);
        assert_eq!(traced.db_system(), "mysql");
    }

    #[test]
    fn test_configured_dialect_wins() {
        let traced = mock_connection(DatabaseBackend::Sqlite)
            .with_tracing_config(TracingConfig::default().with_dialect(Dialect::SqlServer));
        assert_eq!(traced.sanitizer().dialect(), Dialect::SqlServer);
        assert_eq!(traced.db_system(), "sqlite");
    }

    #[tokio::test]
    async fn test_statement_is_sanitized() {
        let statements = recorded_statements(
            TracingConfig::default(),
            "UPDATE users SET name = 'chris'\n WHERE id = 42",
        )
        .await;
        assert_eq!(statements, vec!["UPDATE users SET name = 'chris' WHERE id = ?"]);
    }

    #[tokio::test]
    async fn test_statement_span_records_db_type() {
        let types = recorded_field(
            "db.type",
            TracingConfig::default().with_statement_logging(false),
            "DELETE FROM users WHERE id = 42",
        )
        .await;
        assert_eq!(types, vec!["sql"]);
    }

    #[tokio::test]
    async fn test_pass_through_records_raw_statement() {
        let statements = recorded_statements(
            TracingConfig::default().with_sanitization(false),
            "DELETE FROM users  WHERE id = 42",
        )
        .await;
        assert_eq!(statements, vec!["DELETE FROM users WHERE id = 42"]);
    }

    #[tokio::test]
    async fn test_statement_logging_disabled() {
        let statements = recorded_statements(
            TracingConfig::default().with_statement_logging(false),
            "DELETE FROM users WHERE id = 42",
        )
        .await;
        assert!(statements.is_empty());
    }
}
