//! JSON-RPC transport for Multicall3
//!
//! Encodes the batch as `aggregate3` with `allowFailure = true` and submits
//! it with a single `eth_call` against the chain's Multicall3 deployment.

use super::bindings::IMulticall3;
use super::{CallOutcome, CallRequest, MulticallError, MulticallTransport};
use crate::config::{ChainRegistry, RpcConfig};
use alloy::primitives::{hex, Address, Bytes};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Multicall transport backed by a JSON-RPC node per chain
pub struct RpcTransport {
    registry: Arc<ChainRegistry>,
    client: Client,
}

impl RpcTransport {
    pub fn new(registry: Arc<ChainRegistry>, config: &RpcConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { registry, client })
    }

    /// Perform a raw `eth_call` at the latest block
    pub async fn eth_call(
        &self,
        chain_id: u64,
        to: Address,
        data: &[u8],
    ) -> Result<Bytes, MulticallError> {
        let url = self
            .registry
            .rpc_url(chain_id)
            .ok_or(MulticallError::UnknownChain(chain_id))?;

        tracing::debug!(chain_id, %to, bytes = data.len(), "Sending eth_call");

        let response = self
            .client
            .post(url)
            .json(&eth_call_body(to, data))
            .send()
            .await?
            .error_for_status()?;

        let body: JsonRpcResponse = response.json().await?;
        parse_rpc_response(body)
    }
}

#[async_trait]
impl MulticallTransport for RpcTransport {
    async fn aggregate(
        &self,
        chain_id: u64,
        calls: &[CallRequest],
    ) -> Result<Vec<CallOutcome>, MulticallError> {
        let multicall = self.registry.multicall_address(chain_id);
        let data = encode_aggregate3(calls);
        let raw = self.eth_call(chain_id, multicall, &data).await?;
        decode_aggregate3(&raw)
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<String>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

fn eth_call_body(to: Address, data: &[u8]) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_call",
        "params": [
            { "to": to.to_string(), "data": hex::encode_prefixed(data) },
            "latest"
        ]
    })
}

fn parse_rpc_response(response: JsonRpcResponse) -> Result<Bytes, MulticallError> {
    if let Some(error) = response.error {
        return Err(MulticallError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    let result = response
        .result
        .ok_or_else(|| MulticallError::MalformedResponse("missing result".to_string()))?;

    hex::decode(&result)
        .map(Bytes::from)
        .map_err(|e| MulticallError::MalformedResponse(format!("invalid hex result: {e}")))
}

fn encode_aggregate3(calls: &[CallRequest]) -> Vec<u8> {
    let calls = calls
        .iter()
        .map(|c| IMulticall3::Call3 {
            target: c.target,
            allowFailure: true,
            callData: c.call_data.clone(),
        })
        .collect();

    IMulticall3::aggregate3Call { calls }.abi_encode()
}

fn decode_aggregate3(data: &[u8]) -> Result<Vec<CallOutcome>, MulticallError> {
    let decoded = IMulticall3::aggregate3Call::abi_decode_returns(data, true)
        .map_err(|e| MulticallError::MalformedResponse(e.to_string()))?;

    Ok(decoded
        .returnData
        .into_iter()
        .map(|r| CallOutcome {
            success: r.success,
            return_data: r.returnData,
        })
        .collect())
}
