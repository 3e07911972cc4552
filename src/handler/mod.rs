//! Request handler module
//!
//! Routes each request to a database command, the schema endpoint or a
//! static asset.

pub mod commands;
pub mod router;
pub mod schema;
pub mod static_files;

// Re-export main entry point
pub use router::{handle_request, Route};
