pub mod backend_client;
pub mod encoding;
pub mod error;
pub mod metrics;

pub use backend_client::BackendClient;
pub use encoding::{BodyEncoding, OutboundBody};
pub use error::RelayError;
