//! Multicall batching module
//!
//! Groups many contract reads into a single Multicall3 `aggregate3` call and
//! maps the results back by contract address and function name.

mod batcher;
mod bindings;
mod calls;
mod rpc;

pub use batcher::Multicaller;
pub use bindings::IMulticall3;
pub use calls::{parse_address, ContractCall, FunctionCall};
pub use rpc::RpcTransport;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Multicall errors
#[derive(Debug, Error)]
pub enum MulticallError {
    /// Caller supplied parameters that cannot form a batch
    #[error("Invalid multicall parameters on chain {chain_id}: {reason}")]
    InvalidParameters { chain_id: u64, reason: String },
    /// No RPC endpoint configured for the chain
    #[error("No RPC endpoint configured for chain {0}")]
    UnknownChain(u64),
    /// HTTP transport failure
    #[error("RPC request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// JSON-RPC error object returned by the node
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// Response could not be mapped back onto the submitted calls
    #[error("Malformed multicall response: {0}")]
    MalformedResponse(String),
}

impl MulticallError {
    pub(crate) fn invalid(chain_id: u64, reason: impl Into<String>) -> Self {
        MulticallError::InvalidParameters {
            chain_id,
            reason: reason.into(),
        }
    }
}

/// One encoded call inside an aggregated batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub target: Address,
    pub call_data: Bytes,
}

/// Raw per-call outcome, in submission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub success: bool,
    pub return_data: Bytes,
}

/// Transport that executes an aggregated batch of reads
#[async_trait]
pub trait MulticallTransport: Send + Sync {
    /// Execute all calls in one round-trip, returning outcomes in call order
    async fn aggregate(
        &self,
        chain_id: u64,
        calls: &[CallRequest],
    ) -> Result<Vec<CallOutcome>, MulticallError>;
}

/// Decoded batch results keyed by contract address, then function name
///
/// A call that reverted or returned undecodable data has no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MulticallResults {
    results: HashMap<Address, HashMap<String, DynSolValue>>,
}

impl MulticallResults {
    pub(crate) fn insert(&mut self, address: Address, function: String, value: DynSolValue) {
        self.results
            .entry(address)
            .or_default()
            .insert(function, value);
    }

    /// Decoded value of `function` on `address`, if the call succeeded
    pub fn get(&self, address: &Address, function: &str) -> Option<&DynSolValue> {
        self.results.get(address).and_then(|m| m.get(function))
    }

    /// Convenience accessor for functions returning a single unsigned integer
    pub fn get_uint(&self, address: &Address, function: &str) -> Option<U256> {
        self.get(address, function)
            .and_then(|v| v.as_uint())
            .map(|(value, _)| value)
    }

    /// All successful results for one address
    pub fn for_address(&self, address: &Address) -> Option<&HashMap<String, DynSolValue>> {
        self.results.get(address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.results.keys()
    }

    /// Number of (address, function) entries
    pub fn len(&self) -> usize {
        self.results.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
