//! Outbound body encoding for relayed POST requests.
//!
//! The inbound `Content-Type` selects exactly one strategy. Multipart bodies
//! are forwarded byte-for-byte under the original header so the boundary
//! stays valid; JSON is parsed and re-serialized; form and anything else are
//! forwarded as text.

use crate::services::error::RelayError;
use axum::body::Bytes;
use axum::http::HeaderValue;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";
pub const TEXT_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Multipart,
    Json,
    FormUrlEncoded,
    RawText,
}

/// A body ready to be sent to the backend.
#[derive(Debug, Clone)]
pub struct OutboundBody {
    pub content_type: HeaderValue,
    pub bytes: Bytes,
}

impl BodyEncoding {
    /// Pick a strategy from the inbound `Content-Type`. Matching is a
    /// case-insensitive substring test so parameters like `charset` or
    /// `boundary` do not matter.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(value) = content_type.map(str::to_ascii_lowercase) else {
            return BodyEncoding::RawText;
        };

        if value.contains(MULTIPART_CONTENT_TYPE) {
            BodyEncoding::Multipart
        } else if value.contains(JSON_CONTENT_TYPE) {
            BodyEncoding::Json
        } else if value.contains(FORM_CONTENT_TYPE) {
            BodyEncoding::FormUrlEncoded
        } else {
            BodyEncoding::RawText
        }
    }

    pub fn encode(
        self,
        inbound_content_type: Option<&HeaderValue>,
        body: Bytes,
    ) -> Result<OutboundBody, RelayError> {
        match self {
            BodyEncoding::Multipart => {
                let content_type = inbound_content_type.cloned().ok_or_else(|| {
                    RelayError::InboundBody("multipart body without content type".to_string())
                })?;
                Ok(OutboundBody {
                    content_type,
                    bytes: body,
                })
            }
            BodyEncoding::Json => {
                let value: serde_json::Value = serde_json::from_slice(&body)
                    .map_err(|e| RelayError::InboundBody(e.to_string()))?;
                let bytes = serde_json::to_vec(&value)
                    .map_err(|e| RelayError::InboundBody(e.to_string()))?;
                Ok(OutboundBody {
                    content_type: HeaderValue::from_static(JSON_CONTENT_TYPE),
                    bytes: Bytes::from(bytes),
                })
            }
            BodyEncoding::FormUrlEncoded => Ok(OutboundBody {
                content_type: HeaderValue::from_static(FORM_CONTENT_TYPE),
                bytes: as_text(body),
            }),
            BodyEncoding::RawText => Ok(OutboundBody {
                content_type: HeaderValue::from_static(TEXT_CONTENT_TYPE),
                bytes: as_text(body),
            }),
        }
    }
}

/// Decode as UTF-8, replacing invalid sequences, the way a text body read
/// would.
fn as_text(body: Bytes) -> Bytes {
    if std::str::from_utf8(&body).is_ok() {
        body
    } else {
        Bytes::from(String::from_utf8_lossy(&body).into_owned())
    }
}
