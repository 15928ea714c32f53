//! Matching core throughput benchmarks (Criterion).
//!
//! Run: `cargo bench` or `cargo bench --bench engine`.

use cda_matching_core::{
    ConnectionHandler, GeneratorConfig, InMemoryEventSink, InstrumentRegistry, ManualTimestampSource, OrderId, Side,
};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};

fn bench_submit_throughput(c: &mut Criterion) {
    const N: usize = 2000;
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(N as u64));
    group.bench_function("submit_2000_single_instrument", |b| {
        b.iter_batched(
            || {
                let registry = InstrumentRegistry::new();
                let ts = ManualTimestampSource::starting_at(1);
                let sink = InMemoryEventSink::new();
                let config = GeneratorConfig {
                    seed: 42,
                    num_commands: N,
                    instruments: vec!["GOOG".into()],
                    cancel_ratio: 0.0,
                    ..Default::default()
                };
                (registry, ts, sink, config)
            },
            |(registry, ts, sink, config)| {
                let mut handler = ConnectionHandler::new(&registry, &sink, &ts);
                cda_matching_core::market_data_gen::replay(&mut handler, config);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_submit_with_cancels(c: &mut Criterion) {
    const N: usize = 2000;
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(N as u64));
    group.bench_function("submit_2000_with_cancels", |b| {
        b.iter_batched(
            || {
                let registry = InstrumentRegistry::new();
                let ts = ManualTimestampSource::starting_at(1);
                let sink = InMemoryEventSink::new();
                let config = GeneratorConfig {
                    seed: 7,
                    num_commands: N,
                    instruments: vec!["GOOG".into(), "IBM".into(), "AAPL".into()],
                    cancel_ratio: 0.2,
                    ..Default::default()
                };
                (registry, ts, sink, config)
            },
            |(registry, ts, sink, config)| {
                let mut handler = ConnectionHandler::new(&registry, &sink, &ts);
                cda_matching_core::market_data_gen::replay(&mut handler, config);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_cancel_after_resting(c: &mut Criterion) {
    const RESTING: u32 = 1000;
    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(RESTING as u64));
    group.bench_function("cancel_1000_after_resting", |b| {
        b.iter_batched(
            || {
                let registry = InstrumentRegistry::new();
                let ts = ManualTimestampSource::starting_at(1);
                let sink = InMemoryEventSink::new();
                let book = registry.get_or_create("GOOG");
                for i in 0..RESTING {
                    book.submit_buy(OrderId(i + 1), 100 - (i % 50) as u64, 1, &ts, &sink);
                }
                book
            },
            |book| {
                for i in 0..RESTING {
                    book.cancel(OrderId(i + 1), Side::Buy);
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_submit_throughput, bench_submit_with_cancels, bench_cancel_after_resting);
criterion_main!(benches);
