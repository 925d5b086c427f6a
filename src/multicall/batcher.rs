//! Multicall batcher
//!
//! Validates and encodes every call up front, dispatches one aggregated read
//! through a [`MulticallTransport`], then decodes each outcome against the
//! function it came from.

use super::calls::{parse_address, prepare_call, PreparedCall};
use super::{ContractCall, FunctionCall, MulticallError, MulticallResults, MulticallTransport};
use super::{CallOutcome, CallRequest};
use crate::telemetry::{increment_counter, CounterMetric};
use alloy::dyn_abi::{DynSolValue, FunctionExt};
use alloy::json_abi::JsonAbi;

/// Batches contract reads over a transport
pub struct Multicaller<T> {
    transport: T,
}

impl<T: MulticallTransport> Multicaller<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Many different calls against one contract
    pub async fn get_simple_multicall_results(
        &self,
        chain_id: u64,
        address: &str,
        abi: &JsonAbi,
        calls: &[FunctionCall],
    ) -> Result<MulticallResults, MulticallError> {
        self.get_multicall_results(chain_id, &[address], abi, calls)
            .await
    }

    /// The same set of calls replicated across many contracts sharing an ABI
    pub async fn get_multicall_results<S>(
        &self,
        chain_id: u64,
        addresses: &[S],
        abi: &JsonAbi,
        calls: &[FunctionCall],
    ) -> Result<MulticallResults, MulticallError>
    where
        S: AsRef<str> + Sync,
    {
        if addresses.is_empty() {
            return Err(MulticallError::invalid(chain_id, "empty address list"));
        }
        if calls.is_empty() {
            return Err(MulticallError::invalid(chain_id, "empty call list"));
        }

        let mut prepared = Vec::with_capacity(addresses.len() * calls.len());
        for raw in addresses {
            let address = parse_address(chain_id, raw.as_ref())?;
            for call in calls {
                prepared.push(prepare_call(chain_id, address, abi, call)?);
            }
        }

        self.execute(chain_id, prepared).await
    }

    /// Heterogeneous calls, each with its own address and ABI
    pub async fn get_complex_multicall_results(
        &self,
        chain_id: u64,
        calls: &[ContractCall<'_>],
    ) -> Result<MulticallResults, MulticallError> {
        if calls.is_empty() {
            return Err(MulticallError::invalid(chain_id, "empty call list"));
        }

        let prepared = calls
            .iter()
            .map(|c| {
                let address = parse_address(chain_id, &c.address)?;
                prepare_call(chain_id, address, c.abi, &c.call)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.execute(chain_id, prepared).await
    }

    async fn execute(
        &self,
        chain_id: u64,
        prepared: Vec<PreparedCall>,
    ) -> Result<MulticallResults, MulticallError> {
        let requests: Vec<CallRequest> = prepared
            .iter()
            .map(|p| CallRequest {
                target: p.address,
                call_data: p.call_data.clone(),
            })
            .collect();

        tracing::debug!(chain_id, calls = requests.len(), "Dispatching multicall batch");
        increment_counter(CounterMetric::MulticallBatches, chain_id, 1);
        increment_counter(CounterMetric::MulticallCalls, chain_id, requests.len() as u64);

        let outcomes = self.transport.aggregate(chain_id, &requests).await?;

        if outcomes.len() != prepared.len() {
            return Err(MulticallError::MalformedResponse(format!(
                "expected {} results, got {}",
                prepared.len(),
                outcomes.len()
            )));
        }

        let mut results = MulticallResults::default();
        let mut failures = 0u64;

        for (call, outcome) in prepared.into_iter().zip(outcomes) {
            match decode_outcome(&call, &outcome) {
                Some(value) => results.insert(call.address, call.function.name.clone(), value),
                None => {
                    failures += 1;
                    tracing::debug!(
                        chain_id,
                        address = %call.address,
                        function = %call.function.name,
                        "Multicall entry failed"
                    );
                }
            }
        }

        if failures > 0 {
            increment_counter(CounterMetric::MulticallCallFailures, chain_id, failures);
        }

        Ok(results)
    }
}

/// Decode a single outcome; `None` when the call reverted or decoding failed
///
/// A function without outputs decodes to an empty tuple.
fn decode_outcome(call: &PreparedCall, outcome: &CallOutcome) -> Option<DynSolValue> {
    if !outcome.success {
        return None;
    }

    let mut values = call
        .function
        .abi_decode_output(&outcome.return_data, true)
        .ok()?;

    match values.len() {
        1 => values.pop(),
        _ => Some(DynSolValue::Tuple(values)),
    }
}
