use std::hint::black_box;

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lby_core::{
    build_series, decode_samples, infer_data_offset, DecoderConfig, HeaderFields, LbyBuilder,
    LbyDecoder, SampleWidth, LBY_FORCE_SCALE, LBY_SAMPLE_INTERVAL_S,
};

/// Длины записей в отсчётах: короткий рывок, типичное испытание, длинное
const SAMPLE_AXIS: [usize; 3] = [100, 2_000, 50_000];

fn recording(samples: usize) -> Vec<u8> {
    LbyBuilder::new()
        .timestamp(HeaderFields {
            minute: 30,
            hour: 14,
            day: 10,
            month: 9,
            year: 2025,
        })
        .ramp(samples)
        .build()
}

fn bench_offset_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("infer_data_offset");

    let found = recording(2_000);
    group.bench_function("payload_found", |b| b.iter(|| infer_data_offset(black_box(&found))));

    // худший случай: ни одно окно не подходит
    let noise = vec![0u8; 4_096];
    group.bench_function("fallback", |b| b.iter(|| infer_data_offset(black_box(&noise))));

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let decoder = LbyDecoder::with_timezone(DecoderConfig::default(), Utc);
    let mtime = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut group = c.benchmark_group("decode_bytes");

    for &n in &SAMPLE_AXIS {
        let data = recording(n);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| black_box(decoder.decode_bytes(black_box(data), "HC0010.LBY", mtime)))
        });
    }

    group.finish();
}

fn bench_series(c: &mut Criterion) {
    let data = recording(50_000);
    let payload = &data[infer_data_offset(&data)..];

    c.bench_function("samples_to_series", |b| {
        b.iter(|| {
            let samples = decode_samples(black_box(payload), SampleWidth::Bits32);
            black_box(build_series(&samples, LBY_FORCE_SCALE, LBY_SAMPLE_INTERVAL_S))
        })
    });
}

criterion_group!(benches, bench_offset_inference, bench_decode, bench_series);
criterion_main!(benches);
