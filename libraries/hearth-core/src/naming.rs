//! Managed storage file naming
//!
//! Files in the managed root are named `<token>_<original-filename>`, where
//! the token is a UUID v4 in simple (32 hex digit) form.

use uuid::Uuid;

const TOKEN_LEN: usize = 32;

/// Fresh managed name for `original`
pub fn managed_file_name(original: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), original)
}

/// Recover the original file name from a managed file name
///
/// Returns the whole name when it carries no token prefix.
pub fn original_file_name(managed: &str) -> &str {
    managed
        .split_once('_')
        .filter(|(token, _)| token.len() == TOKEN_LEN && token.chars().all(|c| c.is_ascii_hexdigit()))
        .map_or(managed, |(_, original)| original)
}
