//! Statement classification for span names and query tags.

use crate::sanitizer::Sanitizer;

/// Span name used when the statement's first word is not a known query type.
pub const DEFAULT_OPERATION_NAME: &str = "sql.query";

/// Coarse grouping of a statement by its first word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCategory {
    /// Changes a table's definition or metadata.
    Table,
    Read,
    Write,
    /// A known keyword whose effect can't be told from the first word alone.
    Unknown,
    NotFound,
}

impl QueryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryCategory::Table => "table",
            QueryCategory::Read => "read",
            QueryCategory::Write => "write",
            QueryCategory::Unknown => "unknown",
            QueryCategory::NotFound => "not_found",
        }
    }
}

impl std::fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Categorize a lower-case query type such as `"select"`.
pub fn categorize(query_type: &str) -> QueryCategory {
    match query_type {
        "alter" | "create" | "drop" | "handler" | "rename" | "truncate" => QueryCategory::Table,
        "do" | "select" | "table" => QueryCategory::Read,
        "delete" | "import" | "insert" | "load" | "replace" | "update" => QueryCategory::Write,
        "call" | "values" | "with" => QueryCategory::Unknown,
        _ => QueryCategory::NotFound,
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn squish(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Statement text and classification recorded on a query span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatement {
    /// The squished statement, sanitized unless no sanitizer was given.
    pub statement: String,
    /// First word of `statement`, lower-cased. Empty if the statement is empty.
    pub query_type: String,
    pub category: QueryCategory,
}

impl ParsedStatement {
    /// Squish `sql`, sanitize it when a sanitizer is supplied, and classify the result.
    pub fn parse(sql: &str, sanitizer: Option<&Sanitizer>) -> Self {
        let squished = squish(sql);
        let statement = match sanitizer {
            Some(sanitizer) => sanitizer.sanitize(&squished),
            None => squished,
        };
        let query_type = statement
            .split_whitespace()
            .next()
            .map(str::to_lowercase)
            .unwrap_or_default();
        let category = categorize(&query_type);

        Self {
            statement,
            query_type,
            category,
        }
    }

    /// Span name: the upper-cased query type, or [`DEFAULT_OPERATION_NAME`]
    /// when the first word isn't a recognised keyword.
    pub fn span_name(&self) -> String {
        match self.category {
            QueryCategory::NotFound => DEFAULT_OPERATION_NAME.to_string(),
            _ => self.query_type.to_uppercase(),
        }
    }
}
