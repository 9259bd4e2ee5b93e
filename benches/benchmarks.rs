use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use radix4::Codec;
use std::hint::black_box;

const SIZES: &[usize] = &[16, 64, 256, 1024, 4096, 16384];

fn generate_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for &size in SIZES {
        let data = generate_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("block", size), &data, |b, data| {
            b.iter(|| Codec::block().encode_to_bytes(black_box(data)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("stream", size), &data, |b, data| {
            b.iter(|| Codec::stream().encode_to_bytes(black_box(data)).unwrap())
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for &size in SIZES {
        let data = generate_data(size);
        let block_encoded = Codec::block().encode_to_bytes(&data).unwrap();
        let stream_encoded = Codec::stream().encode_to_bytes(&data).unwrap();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            BenchmarkId::new("block", size),
            &block_encoded,
            |b, encoded| b.iter(|| Codec::block().decode_from_bytes(black_box(encoded)).unwrap()),
        );

        group.bench_with_input(
            BenchmarkId::new("stream", size),
            &stream_encoded,
            |b, encoded| b.iter(|| Codec::stream().decode_from_bytes(black_box(encoded)).unwrap()),
        );
    }

    group.finish();
}

fn bench_compute_encoded_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_encoded_length");
    for &size in SIZES {
        let data = generate_data(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("block", size), &data, |b, data| {
            b.iter(|| {
                Codec::block()
                    .compute_encoded_length(black_box(data))
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_compute_encoded_length);
criterion_main!(benches);
