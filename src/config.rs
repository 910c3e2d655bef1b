//! Configuration constants and server settings.

use crate::server::CorsConfig;
use std::net::SocketAddr;

/// Bind address used when neither `--bind` nor `NETCALC_BIND_ADDR` is set.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Request bodies above this size are rejected with 413.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Default log4rs config file, relative to the working directory.
pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

pub const ENV_BIND_ADDR: &str = "NETCALC_BIND_ADDR";
pub const ENV_MAX_BODY_BYTES: &str = "NETCALC_MAX_BODY_BYTES";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
pub const ENV_ALLOWED_ORIGIN_SUFFIXES: &str = "ALLOWED_ORIGIN_SUFFIXES";

/// Origins allowed when `ALLOWED_ORIGINS` is unset. The first one is also
/// the fallback `Access-Control-Allow-Origin` for unknown callers.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://jerryleonturner3.com",
    "https://www.jerryleonturner3.com",
    "https://jlt-3-tools.vercel.app",
    "https://jacybersecurity.com",
    "https://www.jacybersecurity.com",
];

/// Everything the HTTP service needs at runtime.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_body_bytes: usize,
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Build a config, reading CORS settings from the environment.
    pub fn new(bind_addr: SocketAddr, max_body_bytes: usize) -> Self {
        ServerConfig {
            bind_addr,
            max_body_bytes,
            cors: CorsConfig::from_env(),
        }
    }

    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.max_body_bytes == 0 {
            return Err("max body size must be greater than 0".into());
        }
        if self.cors.allowed_origins.is_empty() {
            return Err("at least one allowed origin is required".into());
        }
        Ok(())
    }
}
