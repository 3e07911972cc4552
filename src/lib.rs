//! dbgate: HTTP front-end for a command-line database
//!
//! Every data route forwards its query parameters to the external database
//! program and relays what it prints; `/schema` reads the schema file directly.

pub mod config;
pub mod db;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
