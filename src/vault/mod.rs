//! Vault module
//!
//! ERC-4626 prize vault state read through the multicall batcher.

mod reader;

pub use reader::{VaultInfo, VaultReader};

use alloy::primitives::{hex, Address};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Vault ID parse errors
#[derive(Debug, Error, PartialEq)]
pub enum VaultIdError {
    #[error("Vault ID must be <address>-<chainId>: {0}")]
    Format(String),
    #[error("Invalid vault address: {0}")]
    Address(String),
    #[error("Invalid chain ID: {0}")]
    ChainId(String),
}

/// A vault is identified by its address and chain, keyed as `${address}-${chainId}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VaultId {
    pub address: Address,
    pub chain_id: u64,
}

impl VaultId {
    pub fn new(address: Address, chain_id: u64) -> Self {
        Self { address, chain_id }
    }
}

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", hex::encode_prefixed(self.address), self.chain_id)
    }
}

impl FromStr for VaultId {
    type Err = VaultIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, chain_id) = s
            .rsplit_once('-')
            .ok_or_else(|| VaultIdError::Format(s.to_string()))?;

        let address = address
            .parse()
            .map_err(|_| VaultIdError::Address(address.to_string()))?;
        let chain_id = chain_id
            .parse()
            .map_err(|_| VaultIdError::ChainId(chain_id.to_string()))?;

        Ok(Self { address, chain_id })
    }
}
