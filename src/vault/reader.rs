//! Vault state reads
//!
//! Two batches per request: share metadata and balances first, then the
//! exchange rate of every vault whose decimals are known, since the rate is
//! read as `convertToAssets(10^decimals)`. Vaults whose `10^decimals` does
//! not fit in 256 bits get no exchange rate.

use super::VaultId;
use crate::multicall::{
    ContractCall, FunctionCall, MulticallError, MulticallResults, MulticallTransport, Multicaller,
};
use crate::odds::calculate_odds;
use crate::shares::{decimals_scale, get_assets_from_shares};
use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, U256};

const VAULT_ABI: [&str; 4] = [
    "function decimals() external view returns (uint8)",
    "function totalSupply() external view returns (uint256)",
    "function balanceOf(address owner) external view returns (uint256)",
    "function convertToAssets(uint256 shares) external view returns (uint256)",
];

/// State of one vault, with the user's balance when one was requested
///
/// A field is `None` when its call reverted.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultInfo {
    pub id: VaultId,
    pub decimals: Option<u8>,
    pub total_supply: Option<U256>,
    /// Assets redeemable for one whole share
    pub exchange_rate: Option<U256>,
    pub user_shares: Option<U256>,
}

impl VaultInfo {
    /// Chance the user wins at least one of `num_prizes`
    pub fn user_odds(&self, vault_contribution: f64, num_prizes: u32) -> f64 {
        calculate_odds(
            self.user_shares.unwrap_or_default(),
            self.total_supply.unwrap_or_default(),
            self.decimals,
            vault_contribution,
            num_prizes,
        )
    }

    /// The user's balance in underlying assets
    pub fn user_assets(&self) -> Option<U256> {
        let shares = self.user_shares?;
        let rate = self.exchange_rate?;
        let decimals = self.decimals?;
        Some(get_assets_from_shares(shares, rate, decimals))
    }
}

/// Reads ERC-4626 vault state over a multicall transport
pub struct VaultReader<T> {
    multicaller: Multicaller<T>,
    abi: JsonAbi,
}

impl<T: MulticallTransport> VaultReader<T> {
    pub fn new(multicaller: Multicaller<T>) -> anyhow::Result<Self> {
        let abi = JsonAbi::parse(VAULT_ABI)?;
        Ok(Self { multicaller, abi })
    }

    pub fn multicaller(&self) -> &Multicaller<T> {
        &self.multicaller
    }

    /// Read every vault, returning one entry per input in the same order
    pub async fn get_vault_infos(
        &self,
        chain_id: u64,
        vaults: &[Address],
        user: Option<Address>,
    ) -> Result<Vec<VaultInfo>, MulticallError> {
        let addresses: Vec<String> = vaults.iter().map(|v| v.to_checksum(None)).collect();

        let mut calls = vec![FunctionCall::bare("decimals"), FunctionCall::bare("totalSupply")];
        if let Some(user) = user {
            calls.push(FunctionCall::new("balanceOf", vec![DynSolValue::Address(user)]));
        }

        let state = self
            .multicaller
            .get_multicall_results(chain_id, &addresses, &self.abi, &calls)
            .await?;

        let decimals: Vec<Option<u8>> = vaults
            .iter()
            .map(|v| state.get_uint(v, "decimals").map(|d| d.saturating_to::<u8>()))
            .collect();

        let rates = self.read_exchange_rates(chain_id, &addresses, &decimals).await?;

        let infos = vaults
            .iter()
            .zip(decimals)
            .map(|(vault, decimals)| VaultInfo {
                id: VaultId::new(*vault, chain_id),
                decimals,
                total_supply: state.get_uint(vault, "totalSupply"),
                exchange_rate: rates.get_uint(vault, "convertToAssets"),
                user_shares: user.and_then(|_| state.get_uint(vault, "balanceOf")),
            })
            .collect::<Vec<_>>();

        tracing::debug!(chain_id, vaults = infos.len(), "Read vault state");
        Ok(infos)
    }

    async fn read_exchange_rates(
        &self,
        chain_id: u64,
        addresses: &[String],
        decimals: &[Option<u8>],
    ) -> Result<MulticallResults, MulticallError> {
        let calls: Vec<ContractCall<'_>> = addresses
            .iter()
            .zip(decimals)
            .filter_map(|(address, decimals)| {
                let one_share = decimals_scale((*decimals)?)?;
                Some(ContractCall::new(
                    address.clone(),
                    &self.abi,
                    FunctionCall::new(
                        "convertToAssets",
                        vec![DynSolValue::Uint(one_share, 256)],
                    ),
                ))
            })
            .collect();

        if calls.is_empty() {
            tracing::warn!(chain_id, "No vault reported usable decimals, skipping exchange rates");
            return Ok(MulticallResults::default());
        }

        self.multicaller
            .get_complex_multicall_results(chain_id, &calls)
            .await
    }
}
