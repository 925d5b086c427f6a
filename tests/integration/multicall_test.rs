//! Integration tests for the multicall batcher

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::primitives::{address, Address, Bytes, U256};
use async_trait::async_trait;
use prize_savings::multicall::{
    CallOutcome, CallRequest, ContractCall, FunctionCall, MulticallError, MulticallTransport,
    Multicaller,
};
use std::sync::atomic::{AtomicUsize, Ordering};

const BROKEN: Address = address!("00000000000000000000000000000000000000ff");

/// Echoes the low byte of the target as a uint, reverting for [`BROKEN`]
struct EchoTransport {
    batches: AtomicUsize,
}

#[async_trait]
impl MulticallTransport for EchoTransport {
    async fn aggregate(
        &self,
        _chain_id: u64,
        calls: &[CallRequest],
    ) -> Result<Vec<CallOutcome>, MulticallError> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        Ok(calls
            .iter()
            .map(|c| CallOutcome {
                success: c.target != BROKEN,
                return_data: Bytes::from(U256::from(c.target.0[19]).to_be_bytes::<32>().to_vec()),
            })
            .collect())
    }
}

fn abi() -> JsonAbi {
    JsonAbi::parse([
        "function totalSupply() external view returns (uint256)",
        "function balanceOf(address owner) external view returns (uint256)",
    ])
    .unwrap()
}

fn multicaller() -> Multicaller<EchoTransport> {
    Multicaller::new(EchoTransport {
        batches: AtomicUsize::new(0),
    })
}

#[tokio::test]
async fn test_replicated_calls_in_one_batch() {
    let multicaller = multicaller();
    let abi = abi();
    let owner = address!("9999999999999999999999999999999999999999");
    let calls = [
        FunctionCall::bare("totalSupply"),
        FunctionCall::new("balanceOf", vec![DynSolValue::Address(owner)]),
    ];
    let addresses = [
        "0x0000000000000000000000000000000000000001",
        "0x0000000000000000000000000000000000000002",
        "0x00000000000000000000000000000000000000ff",
    ];

    let results = multicaller
        .get_multicall_results(1, &addresses, &abi, &calls)
        .await
        .unwrap();

    assert_eq!(multicaller.transport().batches.load(Ordering::SeqCst), 1);
    // Two addresses succeed with two functions each
    assert_eq!(results.len(), 4);
    let two = address!("0000000000000000000000000000000000000002");
    assert_eq!(results.get_uint(&two, "totalSupply"), Some(U256::from(2)));
    assert_eq!(results.get_uint(&two, "balanceOf"), Some(U256::from(2)));
    assert!(results.for_address(&BROKEN).is_none());
}

#[tokio::test]
async fn test_repeated_batches_are_identical() {
    let multicaller = multicaller();
    let abi = abi();
    let calls = [ContractCall::new(
        "0x0000000000000000000000000000000000000005",
        &abi,
        FunctionCall::bare("totalSupply"),
    )];

    let first = multicaller.get_complex_multicall_results(1, &calls).await.unwrap();
    let second = multicaller.get_complex_multicall_results(1, &calls).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_invalid_input_never_reaches_transport() {
    let multicaller = multicaller();
    let abi = abi();

    let empty: [&str; 0] = [];
    assert!(multicaller
        .get_multicall_results(1, &empty, &abi, &[FunctionCall::bare("totalSupply")])
        .await
        .is_err());
    assert!(multicaller
        .get_simple_multicall_results(1, "0x0000000000000000000000000000000000000001", &abi, &[])
        .await
        .is_err());
    let supply = [FunctionCall::bare("totalSupply")];
    assert!(multicaller
        .get_simple_multicall_results(1, "not-an-address", &abi, &supply)
        .await
        .is_err());

    assert_eq!(multicaller.transport().batches.load(Ordering::SeqCst), 0);
}
