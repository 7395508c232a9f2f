use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ratelog::{
    CallSite, CounterRegistry, Format, JsonFields, LogRecord, Logger, MessageFormatter,
    RateLimiter, Severity,
};
use std::io;
use std::sync::Arc;
use std::thread;

fn sink_logger(builder: ratelog::LoggerBuilder) -> Logger {
    let logger = builder
        .with_counter(Arc::new(CounterRegistry::new()))
        .build()
        .unwrap();
    logger.set_output_for_tests(Box::new(io::sink()));
    logger
}

/// Benchmark the minimum-level gate for disabled calls
fn bench_level_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_gate");
    let logger = sink_logger(Logger::builder().with_min_level(Severity::Error));
    let site = CallSite::new("src/bench.rs", 1);

    group.bench_function("disabled_info", |b| {
        b.iter(|| logger.log(Severity::Info, site, format_args!("x = {}", black_box(42))))
    });

    group.finish();
}

/// Benchmark rate limiter decisions
fn bench_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("limiter");

    group.bench_function("disabled", |b| {
        let limiter = RateLimiter::new();
        b.iter(|| limiter.should_suppress(black_box(0), black_box("src/a.rs:1")))
    });

    group.bench_function("suppressing_hot_location", |b| {
        let limiter = RateLimiter::new();
        b.iter(|| limiter.should_suppress(black_box(10), black_box("src/a.rs:1")))
    });

    for locations in [10usize, 1_000, 10_000] {
        let keys: Vec<String> = (0..locations).map(|i| format!("src/m{}.rs:{}", i, i)).collect();
        group.bench_with_input(
            BenchmarkId::new("distinct_locations", locations),
            &keys,
            |b, keys| {
                let limiter = RateLimiter::new();
                let mut i = 0;
                b.iter(|| {
                    i = (i + 1) % keys.len();
                    limiter.should_suppress(100, black_box(&keys[i]))
                })
            },
        );
    }

    group.finish();
}

/// Benchmark line rendering
fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    let record = LogRecord {
        timestamp: Some("2024-03-01T12:30:45.123Z"),
        level: Severity::Warn,
        location: "src/server/listener.rs:142",
        message: "connection reset by peer \"10.0.0.7:443\"",
    };

    for format in [Format::Text, Format::Json] {
        let formatter = MessageFormatter::new(format, JsonFields::default());
        group.bench_function(format.as_str(), |b| {
            b.iter(|| formatter.render(black_box(&record)))
        });
    }

    group.finish();
}

/// Benchmark the full pipeline into a discarding writer
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(1));

    for format in [Format::Text, Format::Json] {
        let logger = sink_logger(Logger::builder().with_format(format));
        group.bench_function(BenchmarkId::new("info", format.as_str()), |b| {
            b.iter(|| logger.infof(format_args!("request {} done", black_box(7))))
        });
    }

    let limited = sink_logger(Logger::builder().with_warns_per_second_limit(10));
    group.bench_function("suppressed_warn", |b| {
        b.iter(|| limited.warnf(format_args!("retry {}", black_box(3))))
    });

    group.finish();
}

/// Benchmark concurrent callers sharing one logger
fn bench_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * 1000) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let logger = Arc::new(sink_logger(Logger::builder().with_errors_per_second_limit(50)));
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let logger = Arc::clone(&logger);
                        thread::spawn(move || {
                            for i in 0..1000 {
                                logger.errorf(format_args!("failure {}", i));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
                logger.reset_limiter();
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_level_gate,
    bench_limiter,
    bench_formatting,
    bench_pipeline,
    bench_concurrent
);
criterion_main!(benches);
