//! Log sanitization utilities
//!
//! Prevents sensitive data (token bundles, admin credentials echoed in
//! response bodies) from being fully exposed in debug/error logs.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit,
/// otherwise returns the first `TRUNCATE_LIMIT` characters with a suffix
/// indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Shorten an opaque token for display (session IDs, state tokens).
///
/// Keeps the first 16 characters, enough to correlate log lines without
/// reproducing the whole token.
pub fn preview_token(token: &str) -> String {
    if token.len() <= 16 {
        token.to_string()
    } else {
        format!("{}...", &token[..floor_char_boundary(token, 16)])
    }
}
