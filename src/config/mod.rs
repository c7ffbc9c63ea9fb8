// Configuration module entry point
// Loads application configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    AuthConfig, AuthUser, Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
    StorageConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `PROFILE_`-prefixed environment variables
    /// override it, e.g. `PROFILE_SERVER__PORT=9000`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("PROFILE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "profile-service/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("storage.persist", false)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Connection timeout: the longer of the read and write timeouts
    pub fn connection_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(std::cmp::max(
            self.performance.read_timeout,
            self.performance.write_timeout,
        ))
    }

    /// A configuration suitable for tests: loopback, ephemeral port, memory store
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            logging: LoggingConfig::default(),
            performance: PerformanceConfig {
                keep_alive_timeout: 5,
                read_timeout: 5,
                write_timeout: 5,
                max_connections: None,
            },
            http: HttpConfig {
                server_name: "profile-service-test".to_string(),
                enable_cors: false,
                max_body_size: 64 * 1024,
            },
            storage: StorageConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}
