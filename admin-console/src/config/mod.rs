use serde::Deserialize;
use service_core::config::{layered_builder, ServerConfig, TelemetryConfig};
use service_core::error::AppError;

/// Environment variable naming the backend origin, kept for compatibility
/// with existing deployments. Wins over `APP_BACKEND__URL`.
pub const BACKEND_URL_ENV: &str = "BACKEND_INTERNAL_URL";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BackendSettings {
    /// Origin of the RAG backend, e.g. `http://backend:8000`.
    #[serde(default = "default_backend_url")]
    pub url: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
        }
    }
}

impl BackendSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Origin without a trailing slash, ready for path concatenation.
    pub fn origin(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let base_path = std::env::current_dir().map_err(AppError::from)?;

    // Run either from the crate directory or from the workspace root
    let configuration_directory = if base_path.ends_with("admin-console") {
        base_path.join("config")
    } else {
        base_path.join("admin-console").join("config")
    };

    let settings = layered_builder(&configuration_directory)?
        .set_default("backend.url", DEFAULT_BACKEND_URL)?
        .set_override_option("backend.url", std::env::var(BACKEND_URL_ENV).ok())?
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}
