//! Criterion benchmarks for evenscribe

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use evenscribe::core::{encode_frame, Ack, Transport};
use evenscribe::prelude::*;
use std::sync::Arc;

/// Accepts every frame without doing I/O
struct NullTransport;

impl Transport for NullTransport {
    fn send_frame(&mut self, frame: &[u8]) -> evenscribe::Result<()> {
        black_box(frame);
        Ok(())
    }

    fn read_ack(&mut self) -> evenscribe::Result<Ack> {
        Ok(Ack::Accepted)
    }

    fn reconnect(&mut self) -> evenscribe::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> evenscribe::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn options(workers: usize) -> Options {
    Options::new()
        .with_service_name("bench")
        .with_number_of_workers(workers)
        .with_print_to_stdout(false)
}

fn null_logger(workers: usize) -> Logger {
    Logger::with_transport(options(workers), Box::new(NullTransport)).unwrap()
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("one_worker", |b| {
        b.iter(|| black_box(null_logger(1)));
    });

    group.bench_function("four_workers", |b| {
        b.iter(|| black_box(null_logger(4)));
    });

    group.finish();
}

// ============================================================================
// Enqueue Benchmarks
// ============================================================================

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(1);

    group.bench_function("info", |b| {
        b.iter(|| {
            logger.info(black_box("Info message"));
        });
    });

    group.bench_function("error_with_args", |b| {
        b.iter(|| {
            logger.error_with(
                black_box("Error message"),
                LogArgs::new()
                    .log_attribute("order_id", "A-1001")
                    .trace_id("4bf92f3577b34da6a3ce929d0e0e4736"),
            );
        });
    });

    group.bench_function("submit_prebuilt", |b| {
        let record = logger.record_builder(Severity::Warn, "Prebuilt").build();
        b.iter(|| {
            logger.submit(black_box(record.clone()));
        });
    });

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    let logger = Arc::new(null_logger(4));

    group.bench_function("multi_thread_4", |b| {
        let logger = Arc::clone(&logger);
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let logger = Arc::clone(&logger);
                    std::thread::spawn(move || {
                        for _ in 0..100 {
                            logger.info(black_box("Concurrent message"));
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Record and Frame Benchmarks
// ============================================================================

fn bench_record_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_building");
    group.throughput(Throughput::Elements(1));

    let builder = RecordBuilder::new()
        .with_body("Request processed")
        .with_severity(Severity::Info2)
        .with_service_name("acme-auth-service")
        .with_trace_id("4bf92f3577b34da6a3ce929d0e0e4736")
        .with_span_id("00f067aa0ba902b7");

    group.bench_function("build", |b| {
        b.iter(|| black_box(builder.build()));
    });

    let record = builder.build();
    group.bench_function("encode_frame", |b| {
        b.iter(|| black_box(encode_frame(black_box(&record)).unwrap()));
    });

    group.bench_function("parse_severity", |b| {
        b.iter(|| black_box("warning3".parse::<Severity>().unwrap()));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_logger_creation,
    bench_enqueue,
    bench_concurrent_logging,
    bench_record_building
);

criterion_main!(benches);
