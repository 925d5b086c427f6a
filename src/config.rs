//! Configuration types for prize-savings

use alloy::primitives::{address, Address};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Canonical Multicall3 deployment, identical on every supported chain
pub const MULTICALL3_ADDRESS: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

/// Default number of records requested per subgraph page
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub subgraph: SubgraphConfig,
    #[serde(default)]
    pub chains: Vec<ChainConfig>,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    #[serde(default)]
    pub json_logs: bool,
    /// Prometheus listener port, disabled when absent
    pub metrics_port: Option<u16>,
}

/// JSON-RPC transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,
}

fn default_rpc_timeout() -> u64 {
    10
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Subgraph transport and pagination configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SubgraphConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_subgraph_timeout")]
    pub timeout_secs: u64,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_subgraph_timeout() -> u64 {
    30
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
        }
    }
}

/// Per-network endpoints and contract addresses
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub id: u64,
    pub name: String,
    pub rpc_url: Option<String>,
    pub subgraph_url: Option<String>,
    #[serde(
        default = "default_multicall_address",
        deserialize_with = "deserialize_address"
    )]
    pub multicall_address: Address,
}

fn default_multicall_address() -> Address {
    MULTICALL3_ADDRESS
}

fn deserialize_address<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Build the immutable chain lookup table
    pub fn registry(&self) -> ChainRegistry {
        ChainRegistry::new(self.chains.iter().cloned())
    }
}

/// Immutable chain ID keyed lookup table, built once at startup
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: HashMap<u64, ChainConfig>,
}

impl ChainRegistry {
    /// Build a registry; a later entry for the same chain ID replaces an earlier one
    pub fn new(chains: impl IntoIterator<Item = ChainConfig>) -> Self {
        let chains = chains.into_iter().map(|c| (c.id, c)).collect();
        Self { chains }
    }

    pub fn get(&self, chain_id: u64) -> Option<&ChainConfig> {
        self.chains.get(&chain_id)
    }

    pub fn rpc_url(&self, chain_id: u64) -> Option<&str> {
        self.get(chain_id).and_then(|c| c.rpc_url.as_deref())
    }

    pub fn subgraph_url(&self, chain_id: u64) -> Option<&str> {
        self.get(chain_id).and_then(|c| c.subgraph_url.as_deref())
    }

    /// Multicall3 address for a chain, falling back to the canonical deployment
    pub fn multicall_address(&self, chain_id: u64) -> Address {
        self.get(chain_id)
            .map(|c| c.multicall_address)
            .unwrap_or(MULTICALL3_ADDRESS)
    }

    /// Chain configs sorted by chain ID
    pub fn chains(&self) -> Vec<&ChainConfig> {
        let mut chains: Vec<&ChainConfig> = self.chains.values().collect();
        chains.sort_by_key(|c| c.id);
        chains
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXAMPLE: &str = r#"
        [telemetry]
        log_level = "info"
        metrics_port = 9090

        [subgraph]
        page_size = 500

        [[chains]]
        id = 10
        name = "optimism"
        rpc_url = "https://mainnet.optimism.io"
        subgraph_url = "https://api.studio.thegraph.com/query/optimism"

        [[chains]]
        id = 8453
        name = "base"
        rpc_url = "https://mainnet.base.org"
        multicall_address = "0x0000000000000000000000000000000000000001"
    "#;

    #[test]
    fn test_config_deserialize() {
        let config: Config = toml::from_str(EXAMPLE).unwrap();
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.metrics_port, Some(9090));
        assert!(!config.telemetry.json_logs);
        assert_eq!(config.subgraph.page_size, 500);
        assert_eq!(config.subgraph.timeout_secs, 30);
        assert_eq!(config.rpc.timeout_secs, 10);
        assert_eq!(config.chains.len(), 2);
    }

    #[test]
    fn test_config_defaults() {
        let toml = r#"
            [telemetry]
            log_level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.subgraph.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.chains.is_empty());
        assert!(config.telemetry.metrics_port.is_none());
    }

    #[test]
    fn test_registry_lookup() {
        let config: Config = toml::from_str(EXAMPLE).unwrap();
        let registry = config.registry();

        assert_eq!(registry.rpc_url(10), Some("https://mainnet.optimism.io"));
        assert!(registry.subgraph_url(8453).is_none());
        assert!(registry.get(1).is_none());
        assert_eq!(registry.multicall_address(10), MULTICALL3_ADDRESS);
        assert_eq!(
            registry.multicall_address(8453),
            address!("0000000000000000000000000000000000000001")
        );
        // Unknown chains fall back to the canonical deployment
        assert_eq!(registry.multicall_address(1), MULTICALL3_ADDRESS);
    }

    #[test]
    fn test_invalid_multicall_address_rejected() {
        let toml = r#"
            [telemetry]
            log_level = "info"

            [[chains]]
            id = 1
            name = "mainnet"
            multicall_address = "0x1234"
        "#;

        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_chains_sorted() {
        let registry = ChainRegistry::new(vec![
            ChainConfig {
                id: 8453,
                name: "base".to_string(),
                rpc_url: None,
                subgraph_url: None,
                multicall_address: MULTICALL3_ADDRESS,
            },
            ChainConfig {
                id: 10,
                name: "optimism".to_string(),
                rpc_url: None,
                subgraph_url: None,
                multicall_address: MULTICALL3_ADDRESS,
            },
        ]);
        let ids: Vec<u64> = registry.chains().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 8453]);
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.chains[0].name, "optimism");
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }
}
