//! Client side of the admin console: the controller behind the login screen,
//! the document table, the upload form and the RAG test box.

pub mod api;
pub mod controller;
pub mod format;
pub mod session;

pub use api::{ApiClient, ApiResponse, ClientError, UploadFile};
pub use controller::{
    BackendStatus, Console, DeleteOutcome, UploadLogEntry, UploadStatus, DOCUMENT_PAGE_SIZE,
};
pub use format::{format_bytes, format_timestamp};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore};
