//! Benchmarks for odds and share conversion math

use alloy::primitives::U256;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prize_savings::odds::{calculate_odds, calculate_union_probability};
use prize_savings::shares::{decimals_scale, get_assets_from_shares, get_shares_from_assets};

fn benchmark_calculate_odds(c: &mut Criterion) {
    let scale = decimals_scale(18).unwrap_or(U256::from(1u64));
    let user = U256::from(50u64) * scale;
    let total = U256::from(1_000_000u64) * scale;

    c.bench_function("calculate_odds", |b| {
        b.iter(|| calculate_odds(black_box(user), black_box(total), Some(18), 0.1, 4))
    });
}

fn benchmark_union_probability(c: &mut Criterion) {
    let values: Vec<f64> = (1..=52).map(|i| i as f64 / 1000.0).collect();

    c.bench_function("union_probability_52", |b| {
        b.iter(|| calculate_union_probability(black_box(&values)))
    });
}

fn benchmark_share_conversion(c: &mut Criterion) {
    let rate = U256::from(1_050_000u64);
    let amount = U256::from(123_456_789u64);

    c.bench_function("assets_shares_round_trip", |b| {
        b.iter(|| {
            let shares = get_shares_from_assets(black_box(amount), rate, 6);
            get_assets_from_shares(shares, rate, 6)
        })
    });
}

criterion_group!(
    benches,
    benchmark_calculate_odds,
    benchmark_union_probability,
    benchmark_share_conversion
);
criterion_main!(benches);
