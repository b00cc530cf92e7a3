//! Criterion benchmarks for rust_redacting_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_redacting_logger::core::{tokenize, LogArg, Renderer, TransportRegistry};
use rust_redacting_logger::prelude::*;
use std::sync::Arc;

fn memory_manager(format: OutputFormat) -> (LoggerManager, MemorySink) {
    let memory = MemorySink::new();
    let config = LoggingConfig::new(LogLevel::Info, "mem")
        .with_transport(TransportSpec::new("mem", TransportKind::Stream).with_format(format));
    let manager = LoggerManager::builder()
        .config(config)
        .stream("mem", memory.clone())
        .on_diagnostic(Arc::new(|_: &str| {}))
        .build()
        .expect("manager");
    (manager, memory)
}

// ============================================================================
// Tokenizer Benchmarks
// ============================================================================

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    group.throughput(Throughput::Elements(1));

    let args = [LogArg::from("alice"), LogArg::from(42)];

    group.bench_function("plain", |b| {
        b.iter(|| tokenize(black_box("request handled"), &[]));
    });

    group.bench_function("substitution", |b| {
        b.iter(|| tokenize(black_box("user %s has %d items"), &args));
    });

    group.bench_function("redacted_region", |b| {
        b.iter(|| tokenize(black_box("user %<%s%> has %d items"), &args));
    });

    group.finish();
}

// ============================================================================
// Renderer Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Elements(1));

    let identity = LoggerIdentity::new("http", Some("GET"), Some("/users")).unwrap();
    let tokens = tokenize("user %<%s%> has %d items", &[LogArg::from("alice"), LogArg::from(42)]);
    let renderer = Renderer::new();

    for format in OutputFormat::ALL {
        let mut registry = TransportRegistry::new();
        let transport = registry
            .build(
                &TransportSpec::new("t", TransportKind::Console)
                    .with_format(format)
                    .into(),
            )
            .unwrap()
            .clone();

        group.bench_function(format.as_str(), |b| {
            b.iter(|| renderer.render(&identity, LogLevel::Info, &transport, black_box(&tokens)));
        });
    }

    group.finish();
}

// ============================================================================
// End-to-end Benchmarks
// ============================================================================

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");
    group.throughput(Throughput::Elements(1));

    let (manager, memory) = memory_manager(OutputFormat::Text);
    let logger = manager.get_logger("bench", Some("run"), None).unwrap();

    group.bench_function("text", |b| {
        b.iter(|| {
            logger.info(black_box("processed %d records"), &[LogArg::from(1000)]);
            if memory.len() > 10_000 {
                memory.clear();
            }
        });
    });

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let (manager, _memory) = memory_manager(OutputFormat::Text);
    let logger = manager.get_logger("bench", None, None).unwrap();

    // Debug is below the info ceiling; this measures the enablement check alone
    group.bench_function("filtered_out", |b| {
        b.iter(|| {
            logger.debug(black_box("never rendered %s"), &[]);
        });
    });

    group.bench_function("macro_filtered_out", |b| {
        b.iter(|| {
            rust_redacting_logger::debug!(logger, "never rendered %s", black_box("arg"));
        });
    });

    group.finish();
}

fn bench_get_logger(c: &mut Criterion) {
    let (manager, _memory) = memory_manager(OutputFormat::Json);
    manager.get_logger("cached", Some("m"), Some("/p")).unwrap();

    c.bench_function("get_logger_cached", |b| {
        b.iter(|| manager.get_logger(black_box("cached"), Some("m"), Some("/p")));
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_render,
    bench_emit,
    bench_level_filtering,
    bench_get_logger
);
criterion_main!(benches);
