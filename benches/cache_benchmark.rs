//! Performance benchmarks for payload chunking and account reconciliation
//!
//! Run with: cargo bench

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use credcache::account_store::sync;
use credcache::token_cache::{join_chunks, split_payload};
use credcache::{Account, AccountKey, DisplayInfo, TokenCacheEntry};
use serde_json::json;

/// Serialized token list of `count` entries with realistic token lengths
fn generate_payload(count: usize) -> String {
    let expires = Utc::now() + Duration::hours(1);
    let entries: Vec<_> = (0..count)
        .map(|i| {
            TokenCacheEntry::new(
                "https://login.microsoftonline.com/common",
                "04b07795-8ddb-461a-bbee-02f9e1bf7b46",
                format!("user{}@contoso.com", i),
                "https://management.core.windows.net/",
                expires,
            )
            .with_field("accessToken", json!("a".repeat(1500)))
            .with_field("refreshToken", json!("r".repeat(800)))
        })
        .collect();
    serde_json::to_string(&entries).unwrap_or_default()
}

fn generate_accounts(count: usize, version: i64) -> Vec<Account> {
    (0..count)
        .map(|i| {
            Account::new(
                AccountKey::new("azure", format!("user-{}", i)),
                DisplayInfo::new(format!("user{}@contoso.com", i)),
            )
            .with_property("version", json!(version))
        })
        .collect()
}

/// Benchmark splitting a payload into store-sized chunks
fn bench_split_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_payload");

    for entries in [1, 10, 50].iter() {
        let payload = generate_payload(*entries);
        group.throughput(Throughput::Bytes(payload.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_entries", entries)),
            &payload,
            |b, payload| {
                b.iter(|| black_box(split_payload(black_box(payload), 2048)));
            },
        );
    }

    group.finish();
}

/// Benchmark reassembling chunks read back from the store
fn bench_join_chunks(c: &mut Criterion) {
    let mut group = c.benchmark_group("join_chunks");

    for entries in [1, 10, 50].iter() {
        let chunks = split_payload(&generate_payload(*entries), 2048);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_entries", entries)),
            &chunks,
            |b, chunks| {
                b.iter(|| black_box(join_chunks(black_box(chunks))));
            },
        );
    }

    group.finish();
}

/// Benchmark reconciling a stored account list against the baseline
fn bench_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("account_sync");

    for count in [10, 100, 500].iter() {
        let baseline = generate_accounts(*count, 1);
        let latest = generate_accounts(*count, 2);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_accounts", count)),
            &(baseline, latest),
            |b, (baseline, latest)| {
                b.iter(|| black_box(sync(Some(baseline.as_slice()), latest.clone())));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_split_payload, bench_join_chunks, bench_sync);
criterion_main!(benches);
