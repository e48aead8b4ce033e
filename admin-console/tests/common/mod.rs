use admin_console::config::{BackendSettings, Settings};
use admin_console::console::{ApiClient, Console, MemorySessionStore};
use admin_console::services::metrics::init_metrics;
use admin_console::startup::Application;
use service_core::config::{ServerConfig, TelemetryConfig};

/// Nothing listens here; connections are refused immediately.
pub const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:1";

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Start the relay on a random port in front of `backend_url`.
    pub async fn spawn(backend_url: &str) -> Self {
        Self::spawn_with_body_limit(backend_url, 1024 * 1024).await
    }

    pub async fn spawn_with_body_limit(backend_url: &str, max_body_bytes: usize) -> Self {
        init_metrics();

        let settings = Settings {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                max_body_bytes,
            },
            backend: BackendSettings::new(backend_url),
            telemetry: TelemetryConfig::default(),
        };

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the listener by polling the relay's own health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp { address, port }
    }

    pub fn proxy_url(&self, path: &str) -> String {
        format!("{}/api/proxy/{}", self.address, path)
    }

    pub fn console(&self, store: MemorySessionStore) -> Console<MemorySessionStore> {
        Console::new(ApiClient::new(&self.address), store)
    }
}
