use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_K: u32 = 4;
pub const MAX_TOP_K: u32 = 10;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QueryRequest {
    pub query: String,
    pub top_k: u32,
}

impl QueryRequest {
    /// Build a request with `top_k` clamped to `1..=MAX_TOP_K`.
    pub fn new(query: impl Into<String>, top_k: u32) -> Self {
        Self {
            query: query.into(),
            top_k: top_k.clamp(1, MAX_TOP_K),
        }
    }
}

/// A retrieved source snippet, in relevance order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SourceDocument {
    pub document_id: String,
    pub filename: String,
    pub content: String,
    pub score: f64,
    #[serde(default)]
    pub page_number: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct QueryResult {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceDocument>,
}
