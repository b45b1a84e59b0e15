use crate::auth::jwt::JwtConfig;

/// Default age in days after which unpublished versions are purged.
pub const DEFAULT_VERSION_RETENTION_DAYS: i64 = pagebuilder_core::page::DEFAULT_RETENTION_DAYS;

/// Default period between retention sweeps.
pub const DEFAULT_RETENTION_INTERVAL_SECS: u64 = 3600;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to stop after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Unpublished versions older than this many days are purged (default: `30`).
    pub version_retention_days: i64,
    /// Seconds between retention sweeps (default: `3600`).
    pub retention_interval_secs: u64,
    /// Renderer endpoint receiving `{ "path": ... }` revalidation calls.
    pub revalidate_webhook_url: Option<String>,
    /// JWT verification settings.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                       |
    /// | `VERSION_RETENTION_DAYS`  | `30`                       |
    /// | `RETENTION_INTERVAL_SECS` | `3600`                     |
    /// | `REVALIDATE_WEBHOOK_URL`  | unset (no dispatch)        |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values, or a retention period below one day.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let version_retention_days: i64 = std::env::var("VERSION_RETENTION_DAYS")
            .unwrap_or_else(|_| DEFAULT_VERSION_RETENTION_DAYS.to_string())
            .parse()
            .expect("VERSION_RETENTION_DAYS must be a valid i64");
        assert!(
            version_retention_days >= 1,
            "VERSION_RETENTION_DAYS must be at least 1"
        );

        let retention_interval_secs: u64 = std::env::var("RETENTION_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_RETENTION_INTERVAL_SECS.to_string())
            .parse()
            .expect("RETENTION_INTERVAL_SECS must be a valid u64");

        let revalidate_webhook_url = std::env::var("REVALIDATE_WEBHOOK_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            version_retention_days,
            retention_interval_secs,
            revalidate_webhook_url,
            jwt,
        }
    }
}
