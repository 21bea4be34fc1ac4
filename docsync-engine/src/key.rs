//! Storage key derivation
//!
//! Keys are derived from the item's link value alone so that renaming a
//! document never orphans its stored copy.

/// Derive the storage key for an item link.
///
/// The scheme prefix is stripped, any character outside the safe object-key
/// alphabet is replaced with `-`, and an `.html` suffix is appended. The
/// mapping is deterministic: the same link always yields the same key.
pub fn storage_key(link_value: &str) -> String {
    let stripped = link_value
        .trim_start_matches("https://")
        .trim_start_matches("http://");

    let mut key = String::with_capacity(stripped.len() + 5);
    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-') {
            key.push(c);
        } else {
            key.push('-');
        }
    }
    key.push_str(".html");
    key
}
