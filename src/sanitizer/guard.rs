//! Input guards run before any pattern matching.

use std::borrow::Cow;

/// Longest statement, in characters, that will be sanitized.
pub const MAX_SQL_LENGTH: usize = 16384;

/// Substituted for each invalid UTF-8 sequence.
pub const REPLACEMENT_CHAR: char = '_';

/// Returns `true` if `sql` is within [`MAX_SQL_LENGTH`] characters.
///
/// Byte length is checked first so that the common case never walks the input.
pub fn bounded(sql: &[u8]) -> bool {
    if sql.len() <= MAX_SQL_LENGTH {
        return true;
    }
    // A character is at most four bytes.
    if sql.len() > MAX_SQL_LENGTH * 4 {
        return false;
    }
    char_count(sql) <= MAX_SQL_LENGTH
}

/// Counts every byte that does not continue a multi-byte sequence.
fn char_count(sql: &[u8]) -> usize {
    sql.iter().filter(|&&b| b & 0xC0 != 0x80).count()
}

/// Make `sql` well-formed text.
///
/// Valid UTF-8 is borrowed as-is. Otherwise every maximal invalid sequence is
/// replaced with a single [`REPLACEMENT_CHAR`]. Oversized input yields `""`
/// without being decoded.
pub fn scrub(sql: &[u8]) -> Cow<'_, str> {
    if !bounded(sql) {
        return Cow::Borrowed("");
    }

    if let Ok(text) = std::str::from_utf8(sql) {
        return Cow::Borrowed(text);
    }

    let mut repaired = String::with_capacity(sql.len());
    for chunk in sql.utf8_chunks() {
        repaired.push_str(chunk.valid());
        if !chunk.invalid().is_empty() {
            repaired.push(REPLACEMENT_CHAR);
        }
    }
    tracing::trace!(
        bytes = sql.len(),
        "Repaired invalid UTF-8 in SQL statement"
    );
    Cow::Owned(repaired)
}
