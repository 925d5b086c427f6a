//! prize-savings: on-chain read and indexer plumbing for prize savings vaults
//!
//! This library provides the core components for:
//! - Multicall3 batching of contract reads
//! - Paginated subgraph queries (draws, prizes, TWAB observations, wallets)
//! - Odds and probability math for prize draws
//! - Fixed-point asset/share conversions
//! - Vault state reads built on the multicall batcher
//! - Configuration and observability

pub mod cli;
pub mod config;
pub mod multicall;
pub mod odds;
pub mod shares;
pub mod subgraph;
pub mod telemetry;
pub mod vault;
