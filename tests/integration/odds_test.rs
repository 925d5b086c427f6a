//! Integration tests for odds and share math

use alloy::primitives::U256;
use prize_savings::odds::{calculate_odds, calculate_union_probability};
use prize_savings::shares::{decimals_scale, get_assets_from_shares, get_shares_from_assets};

fn e18(n: u64) -> U256 {
    U256::from(n) * decimals_scale(18).unwrap()
}

#[test]
fn test_odds_grow_with_balance() {
    let total = e18(1_000);
    let mut previous = 0.0;

    for balance in [1, 10, 100, 500, 1_000] {
        let odds = calculate_odds(e18(balance), total, Some(18), 0.3, 8);
        assert!(odds > previous, "odds should grow with balance");
        assert!(odds <= 1.0);
        previous = odds;
    }
}

#[test]
fn test_odds_across_vaults_combine() {
    let a = calculate_odds(e18(50), e18(100), Some(18), 0.1, 4);
    let b = calculate_odds(e18(100), e18(100), Some(18), 0.2, 1);

    assert!((a - 0.1855).abs() < 1e-4);
    assert!((b - 0.2).abs() < 1e-12);

    let combined = calculate_union_probability(&[a, b]);
    assert!((combined - (1.0 - (1.0 - a) * (1.0 - b))).abs() < 1e-12);
    assert!(combined > a.max(b));
}

#[test]
fn test_deposit_and_withdraw_never_creates_assets() {
    let rate = U256::from(1_030_000u64);

    for assets in [1u64, 7, 999_999, 1_000_001, 123_456_789] {
        let assets = U256::from(assets);
        let shares = get_shares_from_assets(assets, rate, 6);
        assert!(get_assets_from_shares(shares, rate, 6) <= assets);
    }
}
