use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix, e.g. `LOGFLAREX_DATABASE__URL`
pub const ENV_PREFIX: &str = "LOGFLAREX";

/// Routes owned by the API; the metrics endpoint must not shadow them
const RESERVED_PATHS: &[&str] = &["/", "/health", "/logs", "/alerts"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    /// Deadline forwarded to every store call; unset means no deadline
    #[serde(default)]
    pub operation_timeout_ms: Option<u64>,
}

impl DatabaseConfig {
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout_seconds: default_acquire_timeout(),
            operation_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    /// Limit applied when the caller gives none
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    /// Larger requested limits are clamped to this
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlertsConfig {
    #[serde(default = "default_window_minutes")]
    pub default_window_minutes: u32,
    #[serde(default = "default_error_threshold")]
    pub default_error_threshold: u64,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            default_window_minutes: default_window_minutes(),
            default_error_threshold: default_error_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_endpoint")]
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_metrics_endpoint(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_database_url() -> String {
    "sqlite:./data/logflarex.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_limit() -> u32 {
    50
}

fn default_max_limit() -> u32 {
    1000
}

fn default_window_minutes() -> u32 {
    5
}

fn default_error_threshold() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_metrics_endpoint() -> String {
    "/metrics".to_string()
}

/// Load configuration from an optional TOML file, overridden by environment
///
/// A missing file is not an error: every field has a default.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.database.url.trim().is_empty() {
        anyhow::bail!("Database URL cannot be empty");
    }

    if cfg.database.max_connections == 0 {
        anyhow::bail!("database.max_connections must be at least 1");
    }

    if cfg.query.default_limit == 0 {
        anyhow::bail!("query.default_limit must be at least 1");
    }

    if cfg.query.max_limit < cfg.query.default_limit {
        anyhow::bail!(
            "query.max_limit ({}) is smaller than query.default_limit ({})",
            cfg.query.max_limit,
            cfg.query.default_limit
        );
    }

    if cfg.alerts.default_window_minutes == 0 {
        anyhow::bail!("alerts.default_window_minutes must be at least 1");
    }

    match cfg.server.log_format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("Invalid log format '{}': expected 'text' or 'json'", other),
    }

    if cfg.metrics.enabled {
        if !cfg.metrics.endpoint.starts_with('/') {
            anyhow::bail!("metrics.endpoint must start with '/'");
        }
        if RESERVED_PATHS.contains(&cfg.metrics.endpoint.as_str()) {
            anyhow::bail!("metrics.endpoint '{}' collides with an API route", cfg.metrics.endpoint);
        }
    }

    Ok(())
}
