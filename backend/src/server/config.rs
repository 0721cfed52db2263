//! Application configuration loaded via OrthoConfig.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Runtime settings, resolved from CLI arguments, environment variables
/// prefixed `APP_`, and configuration files, in that precedence order.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP")]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<String>,
    /// Path to the session signing key material.
    pub session_key_file: Option<String>,
    /// Whether session cookies carry the `Secure` flag. Disable for local
    /// plain-HTTP development only.
    // `skip_cli` keeps the generated clap flag (which always serialises
    // `false` when absent) from clobbering the `true` default.
    #[ortho_config(default = true, skip_cli)]
    pub cookie_secure: bool,
    /// Maximum database pool size.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Object store gateway endpoint.
    pub media_endpoint: Option<Url>,
    /// Bucket media objects are written into.
    pub media_bucket: Option<String>,
    /// Shared secret for signed media URLs.
    pub media_signing_secret: Option<String>,
    /// Assist provider endpoint. Absent means the feature is disabled.
    pub assist_endpoint: Option<Url>,
    /// Assist provider API key.
    pub assist_api_key: Option<String>,
    /// Assist provider request timeout in milliseconds.
    #[ortho_config(default = 2000)]
    pub assist_timeout_ms: u64,
}

impl AppConfig {
    /// Parsed bind address, falling back to the default listener.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Path the session key is read from.
    pub fn session_key_file(&self) -> &str {
        self.session_key_file
            .as_deref()
            .unwrap_or(DEFAULT_SESSION_KEY_FILE)
    }

    /// Assist provider request timeout.
    pub fn assist_timeout(&self) -> Duration {
        Duration::from_millis(self.assist_timeout_ms)
    }
}
