//! Criterion micro-benchmarks for buffer transfers, seeks and clear.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use globalmem_bench::{page_buffer, payload, BENCH_CAPACITY};
use globalmem_core::SeekMode;
use globalmem_test_utils::CountingSink;

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_write");
    for len in [64usize, 512, BENCH_CAPACITY] {
        let data = payload(len, 1);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &data, |b, data| {
            let mut buffer = page_buffer();
            let mut handle = buffer.open();
            b.iter(|| {
                handle.seek(&buffer, 0, SeekMode::Absolute).unwrap();
                black_box(handle.write(&mut buffer, &data[..]).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_read");
    for len in [64usize, 512, BENCH_CAPACITY] {
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_function(BenchmarkId::from_parameter(len), |b| {
            let mut buffer = page_buffer();
            let mut handle = buffer.open();
            handle.write(&mut buffer, &payload(BENCH_CAPACITY, 3)[..]).unwrap();
            let mut out = vec![0u8; len];
            b.iter(|| {
                handle.seek(&buffer, 0, SeekMode::Absolute).unwrap();
                black_box(handle.read(&buffer, len, &mut out[..]).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_read_counting(c: &mut Criterion) {
    c.bench_function("buffer_read_full_counting_sink", |b| {
        let buffer = page_buffer();
        let mut handle = buffer.open();
        b.iter(|| {
            let mut sink = CountingSink::default();
            handle.seek(&buffer, 0, SeekMode::Absolute).unwrap();
            handle.read(&buffer, BENCH_CAPACITY, &mut sink).unwrap();
            black_box(sink.bytes());
        });
    });
}

fn bench_clear(c: &mut Criterion) {
    c.bench_function("buffer_clear", |b| {
        let mut buffer = page_buffer();
        let handle = buffer.open();
        b.iter(|| {
            handle.reset(&mut buffer);
            black_box(buffer.as_bytes()[0]);
        });
    });
}

criterion_group!(
    benches,
    bench_write,
    bench_read,
    bench_read_counting,
    bench_clear
);
criterion_main!(benches);
