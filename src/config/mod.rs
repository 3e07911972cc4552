// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, DatabaseConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

/// Default config file (without extension) when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `DBGATE_*` environment variables override it,
    /// e.g. `DBGATE_SERVER__PORT=9000` or `DBGATE_DATABASE__BINARY=/opt/mydb`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DBGATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.shutdown_timeout", 30)?
            .set_default("http.server_name", "dbgate")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("http.strict_status", false)?
            .set_default("database.binary", "mydb")?
            .set_default("database.data_dir", ".")?
            .set_default("database.schema_file", "schema.txt")?
            .set_default("database.export_file", "data.csv")?
            .set_default("database.static_dir", "static")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
