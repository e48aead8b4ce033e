//! service-core: shared HTTP infrastructure for the admin console services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
