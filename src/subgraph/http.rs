//! HTTP transport for subgraph queries

use super::{GraphQlRequest, SubgraphError, SubgraphTransport};
use crate::config::SubgraphConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Posts GraphQL requests with `reqwest`
pub struct HttpSubgraphTransport {
    client: Client,
}

impl HttpSubgraphTransport {
    pub fn new(config: &SubgraphConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl SubgraphTransport for HttpSubgraphTransport {
    async fn post(&self, url: &str, request: &GraphQlRequest) -> Result<Value, SubgraphError> {
        let response = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SubgraphError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}
