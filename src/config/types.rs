// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    /// Seconds allowed for a request's headers to arrive (0 disables)
    pub read_timeout: u64,
    /// Seconds to wait for open connections after shutdown is requested
    pub shutdown_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
    /// Report command failures with 4xx/5xx instead of 200
    #[serde(default)]
    pub strict_status: bool,
}

/// External database binary and the files it shares with the server
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// Program name (looked up on `PATH`) or absolute path
    pub binary: String,
    /// Working directory of every invocation
    pub data_dir: PathBuf,
    /// Relative to `data_dir` unless absolute
    pub schema_file: PathBuf,
    /// Passed verbatim to `export` and read back relative to `data_dir`
    pub export_file: String,
    pub static_dir: PathBuf,
}

impl DatabaseConfig {
    pub fn schema_path(&self) -> PathBuf {
        self.data_dir.join(&self.schema_file)
    }

    pub fn export_path(&self) -> PathBuf {
        self.data_dir.join(&self.export_file)
    }

    /// File name announced in `Content-Disposition`
    pub fn export_download_name(&self) -> String {
        std::path::Path::new(&self.export_file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("data.csv")
            .to_string()
    }
}
