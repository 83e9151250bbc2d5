//! Benchmarks for list parsing and classification.

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use edlman::entry::parse_entries;
use edlman::expiry::cutoff_date;
use edlman::pipeline::classify_entry;
use edlman::validation::is_valid_address;
use std::hint::black_box;

/// Generate a list mixing hosts, subnets, IPv6, bad addresses and dates
fn generate_list(count: usize) -> String {
    (0..count)
        .map(|i| {
            let a = (i % 256) as u8;
            let b = ((i / 256) % 256) as u8;
            let address = match i % 5 {
                0 => format!("10.{}.{}.1", a, b),
                1 => format!("172.16.{}.0/24", a),
                2 => format!("2001:db8:{:x}::/48", i % 65536),
                3 => format!("host-{}.example", i),
                _ => format!("192.168.{}.{}", b, a),
            };
            let day = 1 + (i % 28);
            format!("{} # entry {} # 2024-01-{:02}\n", address, i, day)
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_entries");

    for size in [100, 1000, 10000] {
        let content = generate_list(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| black_box(parse_entries(content)));
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_entry");
    let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let cutoff = cutoff_date(today, 30);

    for size in [100, 1000, 10000] {
        let entries = parse_entries(&generate_list(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| {
                entries
                    .iter()
                    .filter_map(|e| classify_entry(e, cutoff))
                    .count()
            });
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let addresses = [
        "10.0.0.1",
        "10.0.0.0/24",
        "10.0.0.5/255.255.255.0",
        "2001:db8::/32",
        "not-an-ip",
        "300.1.1.1",
    ];

    c.bench_function("is_valid_address", |b| {
        b.iter(|| {
            addresses
                .iter()
                .filter(|a| is_valid_address(black_box(a)))
                .count()
        });
    });
}

criterion_group!(benches, bench_parse, bench_classify, bench_validate);
criterion_main!(benches);
