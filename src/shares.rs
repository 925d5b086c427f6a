//! Fixed-point asset/share conversions
//!
//! An exchange rate is the amount of assets one whole share redeems for,
//! scaled by `10^decimals`. Both directions round down, matching ERC-4626
//! integer division, so the two conversions are not exact inverses.

use alloy::primitives::U256;

/// `10^decimals` as a `U256`, `None` past 77 decimals where it no longer fits
pub fn decimals_scale(decimals: u8) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(decimals))
}

/// Convert a share amount into assets: `floor(shares * rate / 10^decimals)`
///
/// Returns zero when `10^decimals` does not fit in 256 bits.
pub fn get_assets_from_shares(shares: U256, exchange_rate: U256, decimals: u8) -> U256 {
    let Some(scale) = decimals_scale(decimals) else {
        return U256::ZERO;
    };

    match shares.checked_mul(exchange_rate) {
        Some(product) => product / scale,
        // Split the division when the full product does not fit in 256 bits
        None => {
            let whole = (shares / scale).saturating_mul(exchange_rate);
            let fraction = (shares % scale).saturating_mul(exchange_rate) / scale;
            whole.saturating_add(fraction)
        }
    }
}

/// Convert an asset amount into shares: `floor(assets * 10^decimals / rate)`
///
/// Returns zero for a zero exchange rate or an unrepresentable `10^decimals`.
pub fn get_shares_from_assets(assets: U256, exchange_rate: U256, decimals: u8) -> U256 {
    if exchange_rate.is_zero() {
        return U256::ZERO;
    }
    let Some(scale) = decimals_scale(decimals) else {
        return U256::ZERO;
    };

    match assets.checked_mul(scale) {
        Some(product) => product / exchange_rate,
        None => {
            let whole = (assets / exchange_rate).saturating_mul(scale);
            let fraction = (assets % exchange_rate).saturating_mul(scale) / exchange_rate;
            whole.saturating_add(fraction)
        }
    }
}
