pub mod health;
pub mod metrics;
pub mod proxy;

pub use health::{backend_health, health_check};
pub use proxy::{proxy_delete, proxy_get, proxy_post, PROXY_PREFIX};
