//! Typed calls against the relay's `/api` surface.

use crate::console::session::Session;
use crate::models::QueryRequest;
use axum::body::Bytes;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Status and raw body of a relay response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A file selected for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

#[derive(serde::Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the relay origin, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn proxy_url(&self, path: &str) -> String {
        format!("{}/api/proxy/{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<ApiResponse, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?;
        read(response).await
    }

    /// Form-encoded credentials, as the backend's OAuth2 password flow expects.
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiResponse, ClientError> {
        let response = self
            .client
            .post(self.proxy_url("auth/login"))
            .form(&LoginForm {
                username: email,
                password,
            })
            .send()
            .await?;
        read(response).await
    }

    pub async fn list_documents(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<ApiResponse, ClientError> {
        let response = self
            .client
            .get(self.proxy_url(&format!("documents/?limit={}", limit)))
            .header(AUTHORIZATION, session.bearer())
            .send()
            .await?;
        read(response).await
    }

    pub async fn upload_document(
        &self,
        session: &Session,
        file: &UploadFile,
    ) -> Result<ApiResponse, ClientError> {
        // The backend classifies uploads by file extension, not part type
        let part = Part::bytes(file.data.clone()).file_name(file.name.clone());

        let response = self
            .client
            .post(self.proxy_url("documents/upload"))
            .header(AUTHORIZATION, session.bearer())
            .multipart(Form::new().part("file", part))
            .send()
            .await?;
        read(response).await
    }

    pub async fn delete_document(
        &self,
        session: &Session,
        document_id: &str,
    ) -> Result<ApiResponse, ClientError> {
        let response = self
            .client
            .delete(self.proxy_url(&format!("documents/{}", document_id)))
            .header(AUTHORIZATION, session.bearer())
            .send()
            .await?;
        read(response).await
    }

    /// The query endpoint is unauthenticated on the backend.
    pub async fn query(&self, request: &QueryRequest) -> Result<ApiResponse, ClientError> {
        let response = self
            .client
            .post(self.proxy_url("chat/query"))
            .json(request)
            .send()
            .await?;
        read(response).await
    }
}

async fn read(response: reqwest::Response) -> Result<ApiResponse, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;
    Ok(ApiResponse { status, body })
}
