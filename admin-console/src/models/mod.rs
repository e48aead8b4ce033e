pub mod document;
pub mod query;
pub mod relay;

pub use document::{Document, DocumentStatus, UploadAccepted};
pub use query::{QueryRequest, QueryResult, SourceDocument};
pub use relay::{RelayMethod, RelayRequest, RelayResponse};
