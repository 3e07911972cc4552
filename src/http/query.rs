//! Query string decoding
//!
//! Parameters keep their arrival order; duplicates are preserved here and
//! collapsed by the argument builders.

use url::form_urlencoded;

/// Decode `a=1&b=2` (no leading `?`) into ordered key/value pairs
pub fn parse_query(query: Option<&str>) -> Vec<(String, String)> {
    query.map_or_else(Vec::new, |q| {
        form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect()
    })
}
