//! Criterion benchmarks for the lifecycle hot paths.
//!
//! Benchmarks:
//! 1. Per-bar lifecycle loop (full single-row simulation)
//! 2. Sizing + leverage pipeline (the per-entry arithmetic)
//! 3. Stop-loss state machine (sequential move checks on an open position)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use leverlab_core::domain::{AccountState, Candle, Position};
use leverlab_core::engines::{assign_leverage, size_entry, StopLossEngine};
use leverlab_core::settings::{
    DynamicOrderSettings, ExchangeSettings, LeverageMode, StaticOrderSettings,
};
use leverlab_core::LifecycleEngine;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_candles(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            Candle {
                timestamp: i as i64 * 60_000,
                open,
                high: close + 1.5,
                low: close - 1.5,
                close,
            }
        })
        .collect()
}

fn dos() -> DynamicOrderSettings {
    DynamicOrderSettings {
        risk_pct: 0.01,
        max_equity_risk_pct: 0.04,
        max_trades: 3,
        risk_reward: 3.0,
        sl_lookback: 20,
        sl_offset_pct: 0.01,
        be_trigger_pct: 0.02,
        trail_trigger_pct: 0.05,
        trail_offset_pct: 0.02,
    }
}

// ── 1. Per-bar lifecycle loop ────────────────────────────────────────

fn bench_lifecycle_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle_loop");
    let statics = StaticOrderSettings::long_defaults();
    let exchange = ExchangeSettings::default();

    for &bar_count in &[1_000, 10_000, 50_000] {
        let candles = make_candles(bar_count);
        group.bench_with_input(
            BenchmarkId::new("signal_every_50", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| {
                    let mut engine =
                        LifecycleEngine::new(&statics, &dos(), &exchange, 0, 10_000.0).unwrap();
                    for bar_idx in 0..candles.len() {
                        let signal = bar_idx % 50 == 0;
                        black_box(engine.process_bar(
                            black_box(&candles),
                            bar_idx,
                            signal,
                            None,
                        ));
                    }
                    black_box(engine.records().len())
                });
            },
        );
    }

    group.finish();
}

// ── 2. Sizing + leverage pipeline ────────────────────────────────────

fn bench_entry_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("entry_pipeline");
    let exchange = ExchangeSettings::default();
    let dos = dos();
    let account = AccountState::new(0, 10_000.0);
    let position = Position::flat();

    group.bench_function("size_and_lever_flat", |b| {
        b.iter(|| {
            let sizing = size_entry(
                black_box(&account),
                black_box(&position),
                &dos,
                &exchange,
                100.0,
                95.0,
            )
            .unwrap();
            let leverage = assign_leverage(
                LeverageMode::Dynamic,
                black_box(&account),
                &sizing,
                &exchange,
                95.0,
            )
            .unwrap();
            black_box((sizing, leverage))
        });
    });

    group.finish();
}

// ── 3. Stop-loss state machine ───────────────────────────────────────

fn bench_stop_machine(c: &mut Criterion) {
    let mut group = c.benchmark_group("stop_machine");
    let statics = StaticOrderSettings::long_defaults();
    let exchange = ExchangeSettings::default();
    let engine = StopLossEngine::from_settings(&statics, &dos(), &exchange);
    let candles = make_candles(10_000);

    group.bench_function("move_checks_10k_bars", |b| {
        b.iter(|| {
            let mut position = Position::flat();
            position.average_entry = 100.0;
            position.position_size_usd = 500.0;
            position.position_size_asset = 5.0;
            position.sl_price = 90.0;
            position.can_move_sl_to_be = true;

            for candle in &candles {
                if let Some(sl) = engine.try_break_even(candle, &position) {
                    position.sl_price = sl;
                    position.can_move_sl_to_be = false;
                }
                if let Some(sl) = engine.try_trail(candle, &position) {
                    position.sl_price = sl;
                }
            }
            black_box(position.sl_price)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lifecycle_loop,
    bench_entry_pipeline,
    bench_stop_machine,
);
criterion_main!(benches);
