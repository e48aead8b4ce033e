pub mod config;
pub mod console;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::BackendClient;
use std::sync::Arc;

/// Shared application state for the relay handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(backend: Arc<BackendClient>, max_body_bytes: usize) -> Self {
        Self {
            backend,
            max_body_bytes,
        }
    }
}
