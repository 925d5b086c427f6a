//! Subgraph module
//!
//! Paginated GraphQL queries against the prize protocol subgraph: draws with
//! prize claims, user prize history, TWAB observations and depositor wallets.

mod client;
mod http;
mod pagination;
mod queries;
mod types;

pub use client::SubgraphClient;
pub use http::HttpSubgraphTransport;
pub use pagination::{
    append_time_ordered, collect_pages, collect_time_ordered_pages, walk_nested_pages, Nested,
    Page, PageCursor, ParentAccumulator, Timestamped,
};
pub use types::{SubgraphDraw, SubgraphPrize, TwabObservation, VaultObservations};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Subgraph errors
#[derive(Debug, Error)]
pub enum SubgraphError {
    /// HTTP transport failure
    #[error("Subgraph request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success HTTP status
    #[error("Subgraph returned {status}: {body}")]
    Status { status: u16, body: String },
    /// A single record could not be parsed
    #[error("Invalid subgraph record: {0}")]
    InvalidRecord(String),
}

/// GraphQL POST body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: Value,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }
}

/// Transport that posts a GraphQL request and returns the raw JSON response
#[async_trait]
pub trait SubgraphTransport: Send + Sync {
    async fn post(&self, url: &str, request: &GraphQlRequest) -> Result<Value, SubgraphError>;
}

/// Items under `data.<root>`; a missing field is an empty page
pub fn extract_root(response: &Value, root: &str) -> Vec<Value> {
    response
        .get("data")
        .and_then(|data| data.get(root))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
