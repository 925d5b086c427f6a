//! Integration tests for configuration loading

use prize_savings::config::{Config, MULTICALL3_ADDRESS};

#[test]
fn test_example_config_parses() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    let registry = config.registry();

    assert!(!registry.is_empty());
    assert_eq!(registry.rpc_url(10), Some("https://mainnet.optimism.io"));
    assert_eq!(registry.multicall_address(42161), MULTICALL3_ADDRESS);
    assert_eq!(config.subgraph.page_size, 1000);
}

#[test]
fn test_chains_listed_by_id() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    let ids: Vec<u64> = config.registry().chains().iter().map(|c| c.id).collect();

    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}
