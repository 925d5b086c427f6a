//! Odds command implementation

use super::parse_u256_arg;
use crate::odds::calculate_odds;
use alloy::primitives::U256;
use clap::Args;

#[derive(Args, Debug)]
pub struct OddsArgs {
    /// User's vault share balance (raw units)
    #[arg(long, value_parser = parse_u256_arg)]
    pub user_shares: U256,

    /// Vault total supply (raw units)
    #[arg(long, value_parser = parse_u256_arg)]
    pub total_shares: U256,

    /// Share token decimals
    #[arg(long, default_value = "18")]
    pub decimals: u8,

    /// Vault's fraction of the prize pool contributions (0..1)
    #[arg(long)]
    pub contribution: f64,

    /// Number of prizes in the draw
    #[arg(long)]
    pub prizes: u32,

    /// Also show the chance of winning at least once over this many draws
    #[arg(long)]
    pub draws: Option<u32>,
}

impl OddsArgs {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let odds = calculate_odds(
            self.user_shares,
            self.total_shares,
            Some(self.decimals),
            self.contribution,
            self.prizes,
        );

        println!("Odds per draw: {:.6} ({})", odds, one_in(odds));

        if let Some(draws) = self.draws {
            let over_draws = odds_over_draws(odds, draws);
            println!("Odds over {} draws: {:.6} ({})", draws, over_draws, one_in(over_draws));
        }

        Ok(())
    }
}

/// Chance of winning at least once across `draws` independent draws
pub(crate) fn odds_over_draws(odds: f64, draws: u32) -> f64 {
    (1.0 - (1.0 - odds).powf(f64::from(draws))).clamp(0.0, 1.0)
}

/// Human-readable `1 in N` form
pub(crate) fn one_in(probability: f64) -> String {
    if probability <= 0.0 {
        "never".to_string()
    } else {
        format!("1 in {:.1}", 1.0 / probability)
    }
}
