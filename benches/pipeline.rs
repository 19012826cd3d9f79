//! Latency benchmarks for the per-tick exit evaluation path.
//!
//! Run with: `cargo bench --bench pipeline`

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use rust_decimal::Decimal;

use sentinel::core::config::{ExitConfig, FeeConfig, RiskLimits, StrategyConfig};
use sentinel::core::types::{apply_delta, ExitReason, Position, Side, StrategyMode};
use sentinel::engine;
use sentinel::risk;

fn open_position(side: Side, mode: StrategyMode) -> Position {
    engine::create_position(
        side,
        Decimal::new(100, 0),
        Decimal::new(500, 0),
        mode,
        Utc::now(),
        &StrategyConfig::default(),
        &ExitConfig::default(),
    )
}

/// Generate a random walk of tick prices around the entry.
fn generate_price_path(rng: &mut impl Rng, ticks: usize) -> Vec<Decimal> {
    let mut path = Vec::with_capacity(ticks);
    let mut price_bps = 10_000i64; // 100.00 in basis points
    for _ in 0..ticks {
        price_bps += rng.gen_range(-15..=15);
        path.push(Decimal::new(price_bps, 2));
    }
    path
}

/// Generate a trade history for the risk gate: alternating wins and losses
/// spread over the last 24 hours.
fn generate_history(count: usize) -> Vec<Position> {
    let now = Utc::now();
    let exit_cfg = ExitConfig::default();
    let fee_cfg = FeeConfig::default();
    let strategy = StrategyConfig::default();

    (0..count)
        .map(|i| {
            let entry_time = now - Duration::hours(20) + Duration::minutes(i as i64 * 17);
            let pos = engine::create_position(
                Side::Long,
                Decimal::new(100, 0),
                Decimal::new(500, 0),
                StrategyMode::Momentum,
                entry_time,
                &strategy,
                &exit_cfg,
            );
            let exit_price = if i % 2 == 0 {
                Decimal::new(10030, 2)
            } else {
                Decimal::new(9990, 2)
            };
            engine::close_position(
                pos,
                exit_price,
                entry_time + Duration::minutes(10),
                ExitReason::TimeoutGreen,
                &exit_cfg,
                &fee_cfg,
            )
            .expect("open position closes")
        })
        .collect()
}

/// Benchmark one pipeline evaluation at representative ticks.
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let exit_cfg = ExitConfig::default();
    let fee_cfg = FeeConfig::default();

    let fresh = open_position(Side::Long, StrategyMode::Momentum);

    let mut trailing = open_position(Side::Long, StrategyMode::Swing);
    let tick = engine::evaluate(
        &trailing,
        Decimal::new(10055, 2),
        trailing.entry_time + Duration::seconds(60),
        None,
        &exit_cfg,
        &fee_cfg,
    );
    trailing = apply_delta(trailing, tick.delta());

    let cases = [
        ("hold_flat", &fresh, Decimal::new(10005, 2)),
        ("trailing_active", &trailing, Decimal::new(10060, 2)),
        ("stop_cross", &trailing, Decimal::new(10010, 2)),
    ];

    for (name, pos, price) in cases {
        let now = pos.entry_time + Duration::seconds(120);
        group.throughput(Throughput::Elements(1));
        group.bench_function(name, |b| {
            b.iter(|| {
                black_box(engine::evaluate(
                    black_box(pos),
                    black_box(price),
                    now,
                    None,
                    &exit_cfg,
                    &fee_cfg,
                ))
            })
        });
    }

    group.finish();
}

/// Benchmark a full tick loop: evaluate and merge deltas over a price path.
fn bench_tick_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_loop");
    let exit_cfg = ExitConfig::default();
    let fee_cfg = FeeConfig::default();
    let mut rng = rand::thread_rng();

    for ticks in [100, 1_000, 10_000].iter() {
        let path = generate_price_path(&mut rng, *ticks);

        group.throughput(Throughput::Elements(*ticks as u64));
        group.bench_with_input(BenchmarkId::new("evaluate_merge", ticks), &path, |b, path| {
            b.iter(|| {
                let mut pos = open_position(Side::Long, StrategyMode::Swing);
                for (i, price) in path.iter().enumerate() {
                    let now = pos.entry_time + Duration::seconds(i as i64);
                    let decision =
                        engine::evaluate(&pos, *price, now, None, &exit_cfg, &fee_cfg);
                    if decision.should_close() {
                        break;
                    }
                    pos = apply_delta(pos, decision.delta());
                }
                black_box(pos)
            })
        });
    }

    group.finish();
}

/// Benchmark the pre-trade risk gate against growing trade histories.
fn bench_risk_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("risk_gate");
    let limits = RiskLimits::default();
    let now = Utc::now();
    let balance = Decimal::new(950, 0);

    for count in [10, 100, 1_000].iter() {
        let history = generate_history(*count);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("check", count), &history, |b, history| {
            b.iter(|| {
                black_box(risk::check_risk_gate(
                    black_box(history),
                    balance,
                    now,
                    &limits,
                ))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_tick_loop, bench_risk_gate);
criterion_main!(benches);
