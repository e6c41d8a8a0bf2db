//! Compiled pattern catalog shared by the dialect rule sets.
//!
//! All patterns are compiled by the `regex` crate, whose matching time is
//! linear in the input length. None of them can backtrack, so repeated
//! delimiters or long `IN` lists cost at most one pass per rule.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bound-parameter echoes appended after the statement, e.g. `[["name", "chris"]]`.
pub(crate) static BIND_ECHO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)\[\[.*\]\]\s*$").unwrap());

/// Single-quoted literal where `\'` and `''` both escape a quote.
pub(crate) static SINGLE_QUOTED_BACKSLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'(?:\\'|[^']|'')*'").unwrap());

/// Double-quoted literal where `\"` and `""` both escape a quote.
pub(crate) static DOUBLE_QUOTED_BACKSLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(?:\\"|[^"]|"")*""#).unwrap());

/// Standard SQL single-quoted literal, `''` escapes a quote.
pub(crate) static SINGLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'(?:[^']|'')*'").unwrap());

/// Whole-word integer. The optional `limit` group lets the rule keep `LIMIT n` intact.
pub(crate) static INTEGER_UNLESS_LIMIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<limit>LIMIT )?\b[0-9]+\b").unwrap());

/// Whole-word integer with no exemptions.
pub(crate) static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9]+\b").unwrap());

/// Postgres positional parameter, `$1`.
pub(crate) static DOLLAR_PARAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$[0-9]+").unwrap());

/// `IN (` followed by a placeholder, up to the first closing paren.
pub(crate) static IN_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bIN\s+\(\?[^)]*\)").unwrap());

/// Same as [`IN_LIST`] but also accepting `@P1`-style named parameters.
pub(crate) static IN_LIST_NAMED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bIN\s+\((?:\?|@\w+)[^)]*\)").unwrap());

/// From `WHERE` up to the next `SELECT` or the end of the statement, across lines.
pub(crate) static AFTER_WHERE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)WHERE\s+.*?(?:SELECT|\z)").unwrap());

/// `EXEC sp_executesql N'<stmt>', <params>`; group 1 is the inner statement.
pub(crate) static EXECUTESQL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"EXEC sp_executesql N'((?:[^']|'')*)'.*").unwrap());

pub(crate) static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Comma-joined placeholders with no spacing, `?,?,?`.
pub(crate) static PLACEHOLDER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?(?:,\?)+").unwrap());
