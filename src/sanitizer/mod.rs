//! Dialect-aware redaction of SQL statements for span tags.
//!
//! A [`Sanitizer`] replaces literals, bind parameters and driver debug echoes
//! with `?` so that `db.statement` stays low-cardinality and free of user data.
//! It is a best-effort pass over the text, not a SQL parser:
//!
//! 1. Statements longer than [`MAX_SQL_LENGTH`] characters become `""`.
//! 2. Invalid UTF-8 is repaired (see [`scrub`]).
//! 3. The dialect's rules run in order, each over the previous rule's output.
//! 4. The result is trimmed.
//!
//! ```rust
//! use sea_orm_sql_tracing::{Dialect, Sanitizer};
//!
//! let mysql = Sanitizer::new(Dialect::Mysql);
//! assert_eq!(
//!     mysql.sanitize(r"INSERT INTO `users` VALUES ('foo', 'b\'ar')"),
//!     "INSERT INTO `users` VALUES (?, ?)"
//! );
//! ```

mod dialect;
mod guard;
mod patterns;
mod rules;

use std::borrow::Cow;

pub use dialect::{resolve, Dialect};
pub use guard::{bounded, scrub, MAX_SQL_LENGTH, REPLACEMENT_CHAR};
pub use rules::PLACEHOLDER;

/// Redacts SQL statements for one [`Dialect`].
///
/// Cheap to copy and safe to share between threads; all compiled patterns
/// live in process-wide statics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sanitizer {
    dialect: Dialect,
}

impl Sanitizer {
    /// Create a sanitizer, compiling the dialect's patterns if this is the
    /// first sanitizer for it in the process.
    pub fn new(dialect: Dialect) -> Self {
        for rule in rules::rules_for(dialect) {
            rule.compile();
        }
        Self { dialect }
    }

    /// The dialect this sanitizer was built for.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Sanitize a statement that is already valid text.
    pub fn sanitize(&self, sql: &str) -> String {
        if !bounded(sql.as_bytes()) {
            tracing::trace!(len = sql.len(), "SQL statement exceeds sanitizer limit");
            return String::new();
        }
        self.apply_rules(sql)
    }

    /// Sanitize raw statement bytes, repairing invalid UTF-8 first.
    pub fn sanitize_bytes(&self, sql: &[u8]) -> String {
        if !bounded(sql) {
            tracing::trace!(len = sql.len(), "SQL statement exceeds sanitizer limit");
            return String::new();
        }
        self.apply_rules(&scrub(sql))
    }

    fn apply_rules(&self, sql: &str) -> String {
        let mut sql = Cow::Borrowed(sql);
        for rule in rules::rules_for(self.dialect) {
            let replaced = match rule.apply(&sql) {
                Cow::Owned(replaced) => Some(replaced),
                Cow::Borrowed(_) => None,
            };
            if let Some(replaced) = replaced {
                sql = Cow::Owned(replaced);
            }
        }
        sql.trim().to_string()
    }
}

impl From<Dialect> for Sanitizer {
    fn from(dialect: Dialect) -> Self {
        Self::new(dialect)
    }
}
