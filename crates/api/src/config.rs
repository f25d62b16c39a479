//! Server configuration loaded from environment variables.

use std::path::PathBuf;

/// HTTP-side configuration.
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `600`; generation calls
    /// are slow).
    pub request_timeout_secs: u64,
    /// Root directory for generated artifacts and staged uploads.
    pub artifact_root: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `8000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `600`                   |
    /// | `ARTIFACT_ROOT`        | `./generated`           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let artifact_root =
            PathBuf::from(std::env::var("ARTIFACT_ROOT").unwrap_or_else(|_| "./generated".into()));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            artifact_root,
        }
    }
}
