//! Integration tests for subgraph pagination

use async_trait::async_trait;
use prize_savings::config::{ChainConfig, ChainRegistry, MULTICALL3_ADDRESS};
use prize_savings::subgraph::{GraphQlRequest, SubgraphClient, SubgraphError, SubgraphTransport};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serves `total` users in pages, like a real indexer would
struct UsersIndexer {
    total: usize,
    requests: AtomicUsize,
}

#[async_trait]
impl SubgraphTransport for UsersIndexer {
    async fn post(&self, _url: &str, request: &GraphQlRequest) -> Result<Value, SubgraphError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let skip = request.variables["skip"].as_u64().unwrap_or(0) as usize;
        let first = request.variables["first"].as_u64().unwrap_or(0) as usize;
        let users: Vec<Value> = (skip..(skip + first).min(self.total))
            .map(|i| json!({ "id": i.to_string(), "address": format!("0x{:040x}", i + 1) }))
            .collect();

        Ok(json!({ "data": { "users": users } }))
    }
}

fn client(total: usize, page_size: usize) -> SubgraphClient<UsersIndexer> {
    let registry = ChainRegistry::new([ChainConfig {
        id: 137,
        name: "polygon".to_string(),
        rpc_url: None,
        subgraph_url: Some("https://indexer.test/polygon".to_string()),
        multicall_address: MULTICALL3_ADDRESS,
    }]);
    let transport = UsersIndexer {
        total,
        requests: AtomicUsize::new(0),
    };
    SubgraphClient::new(Arc::new(registry), transport).with_page_size(page_size)
}

#[tokio::test]
async fn test_full_pages_then_short_page() {
    // Two full pages and a short third page
    let client = client(2_500, 1_000);

    let wallets = client.get_wallet_addresses(137).await.unwrap();

    assert_eq!(wallets.len(), 2_500);
    assert_eq!(client.transport().requests.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_exact_multiple_needs_one_more_request() {
    let client = client(300, 100);

    let wallets = client.get_wallet_addresses(137).await.unwrap();

    assert_eq!(wallets.len(), 300);
    assert_eq!(client.transport().requests.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_unconfigured_chain_is_empty() {
    let client = client(10, 100);

    assert!(client.get_wallet_addresses(1).await.unwrap().is_empty());
    assert_eq!(client.transport().requests.load(Ordering::SeqCst), 0);
}
