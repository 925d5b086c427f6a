//! Vault command implementation

use super::odds::one_in;
use super::parse_address_arg;
use crate::config::Config;
use crate::multicall::{Multicaller, RpcTransport};
use crate::odds::calculate_union_probability;
use crate::vault::VaultReader;
use alloy::primitives::Address;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct VaultArgs {
    /// Chain ID
    #[arg(long)]
    pub chain: u64,

    /// Vault address (repeatable)
    #[arg(long = "vault", required = true, value_parser = parse_address_arg)]
    pub vaults: Vec<Address>,

    /// Read this user's balance and odds
    #[arg(long, value_parser = parse_address_arg)]
    pub user: Option<Address>,

    /// Vault's fraction of the prize pool contributions (0..1)
    #[arg(long, default_value = "0")]
    pub contribution: f64,

    /// Number of prizes in the draw
    #[arg(long, default_value = "0")]
    pub prizes: u32,
}

impl VaultArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let registry = Arc::new(config.registry());
        let transport = RpcTransport::new(registry, &config.rpc)?;
        let reader = VaultReader::new(Multicaller::new(transport))?;

        tracing::info!(chain_id = self.chain, vaults = self.vaults.len(), "Reading vault state");
        let infos = reader
            .get_vault_infos(self.chain, &self.vaults, self.user)
            .await?;

        let mut odds = Vec::with_capacity(infos.len());
        for info in &infos {
            println!("{}", info.id);
            println!("  Decimals:      {}", display(info.decimals));
            println!("  Total supply:  {}", display(info.total_supply));
            println!("  Exchange rate: {}", display(info.exchange_rate));

            if self.user.is_some() {
                println!("  User shares:   {}", display(info.user_shares));
                println!("  User assets:   {}", display(info.user_assets()));

                let vault_odds = info.user_odds(self.contribution, self.prizes);
                println!("  Odds:          {:.6} ({})", vault_odds, one_in(vault_odds));
                odds.push(vault_odds);
            }
        }

        if odds.len() > 1 {
            let combined = calculate_union_probability(&odds);
            println!("Combined odds: {:.6} ({})", combined, one_in(combined));
        }

        Ok(())
    }
}

fn display<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "unavailable".to_string(), |v| v.to_string())
}
