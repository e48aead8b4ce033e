//! The console's page controller.
//!
//! Every public operation is one user action and issues its requests
//! strictly in sequence. Failures never escape as errors: they end up in the
//! view state (`login_error`, upload log entries, the query answer, an empty
//! document list), mirroring what an operator would see on screen.

use crate::console::api::{ApiClient, ApiResponse, UploadFile};
use crate::console::session::{Session, SessionError, SessionStore};
use crate::models::{Document, QueryRequest, QueryResult, SourceDocument, UploadAccepted};
use serde::Deserialize;

/// Documents fetched per listing.
pub const DOCUMENT_PAGE_SIZE: u32 = 50;

pub const LOGIN_FAILED_MESSAGE: &str = "로그인에 실패했습니다.";
pub const UPLOAD_QUEUED_MESSAGE: &str = "업로드 대기 중";
pub const UPLOAD_FAILED_MESSAGE: &str = "업로드 실패";
pub const NETWORK_ERROR_MESSAGE: &str = "네트워크 오류";
pub const QUERY_FAILED_MESSAGE: &str = "요청이 실패했습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    Online,
    #[default]
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Queued,
    Success,
    Error,
}

impl UploadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadStatus::Queued => "queued",
            UploadStatus::Success => "success",
            UploadStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLogEntry {
    pub name: String,
    pub status: UploadStatus,
    pub message: String,
}

/// Outcome of a delete action as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
    Failed,
    NotLoggedIn,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct ErrorDetail {
    detail: Option<serde_json::Value>,
}

pub struct Console<S: SessionStore> {
    api: ApiClient,
    store: S,
    session: Option<Session>,
    backend_status: BackendStatus,
    login_error: Option<String>,
    documents: Vec<Document>,
    upload_log: Vec<UploadLogEntry>,
    answer: Option<String>,
    sources: Vec<SourceDocument>,
}

impl<S: SessionStore> Console<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self {
            api,
            store,
            session: None,
            backend_status: BackendStatus::default(),
            login_error: None,
            documents: Vec::new(),
            upload_log: Vec::new(),
            answer: None,
            sources: Vec::new(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn backend_status(&self) -> BackendStatus {
        self.backend_status
    }

    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn upload_log(&self) -> &[UploadLogEntry] {
        &self.upload_log
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn sources(&self) -> &[SourceDocument] {
        &self.sources
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn check_health(&mut self) -> BackendStatus {
        self.backend_status = match self.api.health().await {
            Ok(response) if response.is_success() => BackendStatus::Online,
            Ok(response) => {
                tracing::debug!(status = response.status.as_u16(), "Backend reported unhealthy");
                BackendStatus::Offline
            }
            Err(e) => {
                tracing::debug!(error = %e, "Health check failed");
                BackendStatus::Offline
            }
        };
        self.backend_status
    }

    /// Pick up a persisted session. Callers refresh documents themselves.
    pub fn restore(&mut self) -> Result<bool, SessionError> {
        self.session = self.store.load()?;
        Ok(self.session.is_some())
    }

    /// Returns whether the login succeeded. Failures land in `login_error`.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.login_error = None;

        let response = match self.api.login(email, password).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Login request failed");
                self.login_error = Some(LOGIN_FAILED_MESSAGE.to_string());
                return false;
            }
        };

        if !response.is_success() {
            let message =
                error_detail(&response).unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string());
            self.login_error = Some(message);
            return false;
        }

        let token = match response.json::<LoginResponse>() {
            Ok(body) => body.access_token,
            Err(e) => {
                tracing::warn!(error = %e, "Login response had no access token");
                self.login_error = Some(LOGIN_FAILED_MESSAGE.to_string());
                return false;
            }
        };

        let session = Session::new(token, Some(email.to_string()));
        if let Err(e) = self.store.save(&session) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
        self.session = Some(session);
        tracing::info!(email, "Logged in");

        self.refresh_documents().await;
        true
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.session = None;
        self.documents.clear();
        self.store.clear()
    }

    /// Any failure leaves an empty list.
    pub async fn refresh_documents(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        self.documents = match self.api.list_documents(session, DOCUMENT_PAGE_SIZE).await {
            Ok(response) if response.is_success() => {
                response.json::<Vec<Document>>().unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Undecodable document listing");
                    Vec::new()
                })
            }
            Ok(response) => {
                tracing::warn!(status = response.status.as_u16(), "Document listing rejected");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Document listing failed");
                Vec::new()
            }
        };
    }

    /// Upload files one after another, then refresh the listing once.
    pub async fn upload(&mut self, files: &[UploadFile]) {
        let Some(session) = self.session.clone() else {
            return;
        };
        if files.is_empty() {
            return;
        }

        self.upload_log = files
            .iter()
            .map(|file| UploadLogEntry {
                name: file.name.clone(),
                status: UploadStatus::Queued,
                message: UPLOAD_QUEUED_MESSAGE.to_string(),
            })
            .collect();

        for (index, file) in files.iter().enumerate() {
            let (status, message) = match self.api.upload_document(&session, file).await {
                Ok(response) if response.is_success() => upload_accepted(&response),
                Ok(response) => {
                    let text = response.text();
                    let message = if text.is_empty() {
                        UPLOAD_FAILED_MESSAGE.to_string()
                    } else {
                        text
                    };
                    (UploadStatus::Error, message)
                }
                Err(e) => {
                    tracing::warn!(file = %file.name, error = %e, "Upload request failed");
                    (UploadStatus::Error, NETWORK_ERROR_MESSAGE.to_string())
                }
            };

            tracing::info!(file = %file.name, status = status.as_str(), "Upload finished");
            let entry = &mut self.upload_log[index];
            entry.status = status;
            entry.message = message;
        }

        self.refresh_documents().await;
    }

    /// `confirm` is asked before anything is sent; on success the listing is
    /// refreshed.
    pub async fn delete<F>(&mut self, document_id: &str, confirm: F) -> DeleteOutcome
    where
        F: FnOnce(&str) -> bool,
    {
        let Some(session) = self.session.as_ref() else {
            return DeleteOutcome::NotLoggedIn;
        };
        if !confirm(document_id) {
            return DeleteOutcome::Declined;
        }

        match self.api.delete_document(session, document_id).await {
            Ok(response) if response.is_success() => {
                tracing::info!(document_id, "Document deleted");
                self.refresh_documents().await;
                DeleteOutcome::Deleted
            }
            Ok(response) => {
                tracing::warn!(document_id, status = response.status.as_u16(), "Delete rejected");
                DeleteOutcome::Failed
            }
            Err(e) => {
                tracing::warn!(document_id, error = %e, "Delete request failed");
                DeleteOutcome::Failed
            }
        }
    }

    /// An empty query is ignored. Responses are applied in the order they
    /// arrive.
    pub async fn run_query(&mut self, query: &str, top_k: u32) {
        if query.is_empty() {
            return;
        }

        self.answer = None;
        self.sources.clear();

        let request = QueryRequest::new(query, top_k);
        let result = match self.api.query(&request).await {
            Ok(response) if response.is_success() => response.json::<QueryResult>(),
            Ok(response) => {
                tracing::warn!(status = response.status.as_u16(), "Query rejected");
                self.answer = Some(QUERY_FAILED_MESSAGE.to_string());
                return;
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(result) => {
                self.answer = Some(result.answer);
                self.sources = result.sources;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Query failed");
                self.answer = Some(QUERY_FAILED_MESSAGE.to_string());
            }
        }
    }
}

fn upload_accepted(response: &ApiResponse) -> (UploadStatus, String) {
    match response.json::<UploadAccepted>() {
        Ok(accepted) => (
            UploadStatus::Success,
            format!("처리 큐 등록 ({})", accepted.task_id),
        ),
        Err(_) => (UploadStatus::Success, "처리 큐 등록".to_string()),
    }
}

/// FastAPI puts a string in `detail` for most errors and a list for
/// validation failures; only the string form is shown.
fn error_detail(response: &ApiResponse) -> Option<String> {
    let body = response.json::<ErrorDetail>().ok()?;
    match body.detail? {
        serde_json::Value::String(detail) => Some(detail),
        _ => None,
    }
}
