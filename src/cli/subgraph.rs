//! Subgraph query commands

use super::parse_address_arg;
use crate::config::Config;
use crate::subgraph::{HttpSubgraphTransport, SubgraphClient};
use alloy::primitives::Address;
use clap::Args;
use std::sync::Arc;

fn client(config: &Config) -> anyhow::Result<SubgraphClient<HttpSubgraphTransport>> {
    let transport = HttpSubgraphTransport::new(&config.subgraph)?;
    Ok(SubgraphClient::new(Arc::new(config.registry()), transport)
        .with_page_size(config.subgraph.page_size))
}

#[derive(Args, Debug)]
pub struct DrawsArgs {
    /// Chain ID
    #[arg(long)]
    pub chain: u64,
}

impl DrawsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let draws = client(config)?.get_paginated_draws(self.chain).await?;

        let claims: usize = draws.iter().map(|d| d.prize_claims.len()).sum();
        println!("Chain {}: {} draws, {} prize claims", self.chain, draws.len(), claims);
        for draw in &draws {
            println!("  Draw {:>5}: {} claims", draw.id, draw.prize_claims.len());
        }

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct PrizesArgs {
    /// Chain ID
    #[arg(long)]
    pub chain: u64,

    /// Winner address
    #[arg(long, value_parser = parse_address_arg)]
    pub user: Address,
}

impl PrizesArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let prizes = client(config)?
            .get_user_prizes(self.chain, self.user)
            .await?;

        println!("{} prizes won by {}", prizes.len(), self.user);
        for prize in &prizes {
            println!(
                "  Draw {:>5} tier {} index {:>4}: payout {} (vault {}, at {})",
                prize.draw_id,
                prize.tier,
                prize.prize_index,
                prize.payout,
                prize.vault,
                prize.timestamp
            );
        }

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ObservationsArgs {
    /// Chain ID
    #[arg(long)]
    pub chain: u64,

    /// Account address
    #[arg(long, value_parser = parse_address_arg)]
    pub user: Address,
}

impl ObservationsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let vaults = client(config)?
            .get_user_observations(self.chain, self.user)
            .await?;

        println!("{} vaults with observations for {}", vaults.len(), self.user);
        for vault in &vaults {
            match vault.observations.last() {
                Some(latest) => println!(
                    "  {}: {} observations, latest balance {} at {}",
                    vault.vault,
                    vault.observations.len(),
                    latest.balance,
                    latest.timestamp
                ),
                None => println!("  {}: no observations", vault.vault),
            }
        }

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct WalletsArgs {
    /// Chain ID
    #[arg(long)]
    pub chain: u64,
}

impl WalletsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let wallets = client(config)?.get_wallet_addresses(self.chain).await?;

        println!("Chain {}: {} wallets", self.chain, wallets.len());
        for wallet in &wallets {
            println!("  {}", wallet);
        }

        Ok(())
    }
}
