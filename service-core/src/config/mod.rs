use crate::error::AppError;
use config::{Config, ConfigBuilder, File, builder::DefaultState};
use serde::Deserialize;
use std::path::Path;

/// Listener settings shared by every HTTP surface.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on buffered inbound request bodies.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector endpoint; span export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Start a layered configuration: `base.yaml` in `config_dir` (optional),
/// then `APP_*` environment variables with `__` as the nesting separator.
///
/// Callers add their own defaults and overrides before building.
pub fn layered_builder(config_dir: &Path) -> Result<ConfigBuilder<DefaultState>, AppError> {
    dotenvy::dotenv().ok();

    let builder = Config::builder()
        .set_default("server.host", default_host())?
        .set_default("server.port", i64::from(default_port()))?
        .set_default("server.max_body_bytes", default_max_body_bytes() as i64)?
        .set_default("telemetry.log_level", default_log_level())?
        .add_source(File::from(config_dir.join("base.yaml")).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        );

    Ok(builder)
}
