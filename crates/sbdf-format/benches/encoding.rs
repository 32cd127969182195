//! Benchmarks for SBDF array encoding and decoding.

#![allow(clippy::unwrap_used, missing_docs)]

use bytes::BytesMut;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sbdf_format::{EncodedArray, ValueArray};

fn bench_plain_int_encode(c: &mut Criterion) {
    let encoded = EncodedArray::plain(ValueArray::Int((0..10_000).collect()));

    let mut group = c.benchmark_group("plain_int");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("encode", |b| {
        b.iter(|| {
            let mut buf = BytesMut::with_capacity(40_010);
            encoded.write(&mut buf).unwrap();
            black_box(buf)
        })
    });

    let bytes = encoded.to_bytes().unwrap();
    group.bench_function("decode", |b| {
        b.iter(|| {
            let decoded = EncodedArray::read(&mut bytes.as_ref()).unwrap();
            black_box(decoded)
        })
    });
    group.finish();
}

fn bench_rle_encode(c: &mut Criterion) {
    let values: Vec<i64> = (0..10_000).map(|i| i64::from(i / 100)).collect();
    let encoded = EncodedArray::run_length(ValueArray::Long(values)).unwrap();

    let mut group = c.benchmark_group("rle_long");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("encode", |b| {
        b.iter(|| {
            let mut buf = BytesMut::new();
            encoded.write(&mut buf).unwrap();
            black_box(buf)
        })
    });

    let bytes = encoded.to_bytes().unwrap();
    group.bench_function("decode", |b| {
        b.iter(|| {
            let decoded = EncodedArray::read(&mut bytes.as_ref()).unwrap();
            black_box(decoded)
        })
    });
    group.finish();
}

fn bench_packed_bit(c: &mut Criterion) {
    let values: Vec<bool> = (0..10_000).map(|i| i % 3 == 0).collect();
    let encoded = EncodedArray::packed_bit(ValueArray::Bool(values)).unwrap();

    let mut group = c.benchmark_group("packed_bit");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("encode", |b| {
        b.iter(|| {
            let mut buf = BytesMut::new();
            encoded.write(&mut buf).unwrap();
            black_box(buf)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_plain_int_encode,
    bench_rle_encode,
    bench_packed_bit
);
criterion_main!(benches);
