//! `ETag` generation and conditional request handling for static assets.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Quoted `ETag` for the given content, e.g. `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check whether the client's cached copy is still fresh
///
/// # Arguments
///
/// * `if_none_match` - Raw `If-None-Match` header, possibly a comma list
/// * `etag` - Current `ETag` of the asset
///
/// # Returns
///
/// `true` when the header lists `etag` or `*`, so a 304 can be sent.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}
