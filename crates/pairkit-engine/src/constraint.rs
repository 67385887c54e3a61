//! Forbid / require evaluation over full assignments.
//!
//! A pattern matches a row when every one of its bindings is present in the
//! row with the same value. Keys the pattern omits are unconstrained; a key
//! the row lacks makes the pattern fail.

use pairkit_ir::types::{Pattern, Row};

/// Whether `row` carries every binding of `pattern`.
pub fn pattern_matches(pattern: &Pattern, row: &Row) -> bool {
    pattern.iter().all(|(k, v)| row.get(k) == Some(v))
}

/// True iff any forbid pattern matches the row.
pub fn violates_forbid(row: &Row, forbid: &[Pattern]) -> bool {
    forbid.iter().any(|p| pattern_matches(p, row))
}

/// True iff the require list is empty or at least one pattern matches.
pub fn satisfies_require(row: &Row, require: &[Pattern]) -> bool {
    require.is_empty() || require.iter().any(|p| pattern_matches(p, row))
}
