use serde::{Deserialize, Serialize};

/// A document as listed by the backend. Owned entirely by the backend; the
/// console only reads and renders it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub file_type: String,
    pub file_size: u64,
    pub status: String, // open set, see DocumentStatus
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Document {
    pub fn status_kind(&self) -> DocumentStatus {
        DocumentStatus::classify(&self.status)
    }
}

/// Display classification of the backend's free-form status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    Ready,
    Processing,
    Failed,
    Completed,
    Other,
}

impl DocumentStatus {
    pub fn classify(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "ready" => DocumentStatus::Ready,
            "processing" => DocumentStatus::Processing,
            "failed" => DocumentStatus::Failed,
            "completed" => DocumentStatus::Completed,
            _ => DocumentStatus::Other,
        }
    }
}

/// Body of a successful upload: the backend queued the file for processing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UploadAccepted {
    pub task_id: String,
}
