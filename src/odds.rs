//! Prize odds math
//!
//! A draw awards `n` prizes. A user holding a fraction `s` of a vault that
//! contributed a fraction `c` of the prize pool wins each prize with
//! probability `p = s * c`, so the chance of winning at least one is
//! `1 - (1 - p)^n`.

use alloy::primitives::U256;

/// Fixed-point precision used to turn a share ratio into a float
const RATIO_PRECISION: u128 = 1_000_000_000_000_000_000;

/// Probability (0..1) of winning at least one prize in one draw
///
/// Missing or zero inputs yield `0.0`. A user holding at least the total
/// supply is treated as owning the whole vault.
pub fn calculate_odds(
    user_shares: U256,
    total_shares: U256,
    decimals: Option<u8>,
    vault_contribution: f64,
    num_prizes: u32,
) -> f64 {
    if user_shares.is_zero()
        || total_shares.is_zero()
        || decimals.is_none()
        || num_prizes == 0
        || !vault_contribution.is_finite()
        || vault_contribution <= 0.0
    {
        return 0.0;
    }

    let share_fraction = share_fraction(user_shares, total_shares);
    let per_prize = (share_fraction * vault_contribution).clamp(0.0, 1.0);

    (1.0 - (1.0 - per_prize).powf(f64::from(num_prizes))).clamp(0.0, 1.0)
}

/// Union probability of independent events via pairwise inclusion-exclusion
pub fn calculate_union_probability(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v - acc * v)
}

/// `user / total` as a float, clamped to 1
fn share_fraction(user_shares: U256, total_shares: U256) -> f64 {
    if user_shares >= total_shares {
        return 1.0;
    }

    let precision = U256::from(RATIO_PRECISION);
    let scaled = match user_shares.checked_mul(precision) {
        Some(product) => product / total_shares,
        // Only reachable for totals far above the precision, so the divisor is non-zero
        None => user_shares / (total_shares / precision),
    };

    scaled.saturating_to::<u128>() as f64 / RATIO_PRECISION as f64
}
