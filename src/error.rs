//! Setup-time errors.
//!
//! Nothing on the per-query path returns these: sanitization degrades to an
//! empty or partially redacted statement instead of failing.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SanitizerError {
    #[error("unknown sanitizer dialect {name:?} (expected one of mysql, postgres, sql_server, sqlite)")]
    UnknownDialect { name: String },

    #[error("no sanitizer dialect for database adapter {adapter:?}")]
    UnknownAdapter { adapter: String },
}

pub type Result<T> = std::result::Result<T, SanitizerError>;
