//! # sea-orm-sql-tracing
//!
//! Tracing instrumentation for SeaORM with dialect-aware SQL statement sanitization.
//!
//! Every query executed through a [`TracedConnection`] runs inside a span that
//! records the statement with its literals, bind parameters and driver debug
//! echoes replaced by `?`. The recorded `db.statement` stays low-cardinality
//! and never carries user data, so it can be left on in production.
//!
//! ## Features
//!
//! - **Automatic Instrumentation**: All queries executed through `TracedConnection` are traced
//! - **Sanitized Statements**: MySQL, PostgreSQL, SQL Server and SQLite rule sets
//! - **Bounded Cost**: Statements over 16384 characters are dropped, every pattern matches in linear time
//! - **Proper Span Nesting**: Database spans appear as children of HTTP request spans
//! - **Performance Metrics**: Query duration, row counts, and error tracking
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sea_orm::Database;
//! use sea_orm_sql_tracing::TracedConnection;
//!
//! let db = Database::connect("postgres://localhost/mydb").await?;
//! let traced_db = TracedConnection::from(db);
//!
//! let users = Users::find().all(&traced_db).await?;
//! ```
//!
//! ## Sanitizing Without a Connection
//!
//! ```rust
//! use sea_orm_sql_tracing::resolve;
//!
//! let sanitizer = resolve("postgres")?;
//! assert_eq!(
//!     sanitizer.sanitize(r#"SELECT "users".* FROM "users" WHERE "users"."name" = $1 [["name","chris"]]"#),
//!     r#"SELECT "users".* FROM "users" WHERE "users"."name" = ?"#,
//! );
//! # Ok::<(), sea_orm_sql_tracing::SanitizerError>(())
//! ```
//!
//! ## Span Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `db.system` | "postgresql", "mysql", "mssql" or "sqlite", from the backend |
//! | `db.type` | "sql" |
//! | `db.statement` | Sanitized SQL (raw in pass-through mode) |
//! | `db.query_type` | First word of the statement, lower-cased |
//! | `db.query_category` | "read", "write", "table", "unknown" or "not_found" |
//! | `db.instance` | Database name (when configured) |
//! | `peer.address` | `adapter://user@host/database` (when configured) |
//! | `db.rows_affected` | Number of rows returned/affected |
//! | `otel.status_code` | "OK" or "ERROR" |
//! | `error.message` | Error details (on failure) |

mod config;
mod connection;
mod error;
mod parser;
pub mod sanitizer;

pub use config::TracingConfig;
pub use connection::{TracedConnection, TracingExt};
pub use error::{Result, SanitizerError};
pub use parser::{categorize, squish, ParsedStatement, QueryCategory, DEFAULT_OPERATION_NAME};
pub use sanitizer::{resolve, Dialect, Sanitizer, MAX_SQL_LENGTH, PLACEHOLDER};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Dialect, Sanitizer, TracedConnection, TracingConfig, TracingExt};
}
