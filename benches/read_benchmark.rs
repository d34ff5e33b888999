// benches/read_benchmark.rs
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use wellog_rs::*;

fn make_blob(rows: usize, channels: usize) -> String {
    let mut blob = String::from("[");
    for row in 0..rows {
        if row > 0 {
            blob.push(',');
        }
        blob.push_str(&format!("[[{:.1}],[", 1000.0 + row as f64 * 0.5));
        for channel in 0..channels {
            if channel > 0 {
                blob.push(',');
            }
            if (row + channel) % 7 == 0 {
                blob.push_str("null");
            } else {
                blob.push_str(&format!("{:.3}", (row * channels + channel) as f64 * 0.01));
            }
        }
        blob.push_str("]]");
    }
    blob.push(']');
    blob
}

fn channel_names(channels: usize) -> (Vec<String>, Vec<String>) {
    let mnemonics = (0..channels).map(|i| format!("CH{}", i)).collect();
    let units = (0..channels).map(|_| "unitless".to_string()).collect();
    (mnemonics, units)
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [1000, 10000, 100000].iter() {
        let blob = make_blob(*size, 8);
        let (mnemonics, units) = channel_names(8);
        group.throughput(Throughput::Bytes(blob.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                ChannelDataReader::new(&blob, mnemonics.clone(), units.clone()).unwrap()
            });
        });
    }

    group.finish();
}

fn benchmark_cursor_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor_scan");

    for size in [1000, 10000, 100000].iter() {
        let blob = make_blob(*size, 8);
        let (mnemonics, units) = channel_names(8);
        let reader = ChannelDataReader::new(&blob, mnemonics, units).unwrap();
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut r = reader.clone();
                let mut sum = 0.0;
                while r.read() {
                    sum += r.get_double(1);
                }
                sum
            });
        });
    }

    group.finish();
}

fn benchmark_channel_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_range");

    for size in [1000, 10000, 100000].iter() {
        let blob = make_blob(*size, 8);
        let (mnemonics, units) = channel_names(8);
        let reader = ChannelDataReader::new(&blob, mnemonics, units).unwrap();
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| reader.get_channel_index_range(4));
        });
    }

    group.finish();
}

fn benchmark_block_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_append");

    for size in [1000, 10000].iter() {
        group.throughput(Throughput::Elements((*size * 4) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut block = ChannelDataBlock::with_max_records(size + 1);
                block.add_index("MD", "m", true, false);
                for id in 1..=4 {
                    block.add_channel(id, format!("CH{}", id), "unitless");
                }
                for row in 0..size {
                    let index = [1000.0 + row as f64 * 0.5];
                    for id in 1..=4 {
                        block.append(id, &index, CellValue::Number(row as f64 + id as f64));
                    }
                }
                block.reader()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_cursor_scan,
    benchmark_channel_range,
    benchmark_block_append
);
criterion_main!(benches);
