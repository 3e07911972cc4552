//! HTTP protocol layer module
//!
//! Response builders, content types, cache validation and query decoding,
//! independent of the database routes.

pub mod cache;
pub mod mime;
pub mod query;
pub mod response;

// Re-export commonly used items
pub use query::parse_query;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_options_response, HttpResponse,
};
