//! CLI interface for prize-savings
//!
//! Provides subcommands for:
//! - `odds`: Offline odds from explicit share balances
//! - `vault`: Read vault state (and a user's balance) via Multicall3
//! - `draws`, `prizes`, `observations`, `wallets`: Paginated subgraph queries
//! - `config`: Show the configured chains

mod odds;
mod subgraph;
mod vault;

pub use odds::OddsArgs;
pub use subgraph::{DrawsArgs, ObservationsArgs, PrizesArgs, WalletsArgs};
pub use vault::VaultArgs;

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "prize-savings")]
#[command(about = "Read prize savings vaults, draws and odds across chains")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute odds from explicit inputs
    Odds(OddsArgs),
    /// Read vault state through Multicall3
    Vault(VaultArgs),
    /// List draws and their prize claims
    Draws(DrawsArgs),
    /// List prizes won by a user
    Prizes(PrizesArgs),
    /// Show a user's TWAB observations per vault
    Observations(ObservationsArgs),
    /// List depositor wallet addresses
    Wallets(WalletsArgs),
    /// Show configured chains
    Config,
}

fn parse_address_arg(raw: &str) -> Result<Address, String> {
    raw.parse().map_err(|e| format!("invalid address {raw}: {e}"))
}

fn parse_u256_arg(raw: &str) -> Result<U256, String> {
    raw.parse().map_err(|e| format!("invalid integer {raw}: {e}"))
}
