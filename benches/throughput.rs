//! Throughput benchmarks for the EmberKV cache store.
//!
//! Every workload runs once per eviction policy so LRU and LFU can be
//! compared side by side.

use bytes::{Bytes, BytesMut};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use emberkv::protocol::{parse_command, split_line};
use emberkv::storage::{CacheStore, PolicyKind};
use std::sync::Arc;
use std::time::Duration;

const POLICIES: [PolicyKind; 2] = [PolicyKind::Lru, PolicyKind::Lfu];

fn populated(capacity: usize, kind: PolicyKind, keys: u64) -> CacheStore {
    let store = CacheStore::new(capacity, kind);
    for i in 0..keys {
        store.set(
            Bytes::from(format!("key:{}", i)),
            Bytes::from(format!("value:{}", i)),
        );
    }
    store
}

/// SET into a store that never fills up
fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    for kind in POLICIES {
        group.bench_with_input(BenchmarkId::new("no_eviction", kind), &kind, |b, &kind| {
            let store = CacheStore::new(usize::MAX, kind);
            let value = Bytes::from("small_value");
            let mut i = 0u64;
            b.iter(|| {
                store.set(Bytes::from(format!("key:{}", i)), value.clone());
                i += 1;
            });
        });
    }

    group.finish();
}

/// SET into a full store: every insert evicts
fn bench_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("eviction");
    group.throughput(Throughput::Elements(1));

    for kind in POLICIES {
        group.bench_with_input(BenchmarkId::new("full_store", kind), &kind, |b, &kind| {
            let store = populated(10_000, kind, 10_000);
            let value = Bytes::from("value");
            let mut i = 0u64;
            b.iter(|| {
                store.set(Bytes::from(format!("new:{}", i)), value.clone());
                i += 1;
            });
        });
    }

    group.finish();
}

/// GET hits and misses
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    for kind in POLICIES {
        let store = populated(100_000, kind, 100_000);

        group.bench_with_input(BenchmarkId::new("existing", kind), &store, |b, store| {
            let mut i = 0u64;
            b.iter(|| {
                let key = Bytes::from(format!("key:{}", i % 100_000));
                black_box(store.get(&key));
                i += 1;
            });
        });

        group.bench_with_input(BenchmarkId::new("missing", kind), &store, |b, store| {
            let mut i = 0u64;
            b.iter(|| {
                let key = Bytes::from(format!("missing:{}", i));
                black_box(store.get(&key));
                i += 1;
            });
        });
    }

    group.finish();
}

/// Mixed workload (80% reads, 20% writes) against a store under pressure
fn bench_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.throughput(Throughput::Elements(1));

    for kind in POLICIES {
        group.bench_with_input(BenchmarkId::new("80_read_20_write", kind), &kind, |b, &kind| {
            let store = populated(5_000, kind, 10_000);
            let mut i = 0u64;
            b.iter(|| {
                if i % 5 == 0 {
                    // 20% writes
                    store.set_with_ttl(
                        Bytes::from(format!("key:{}", i % 20_000)),
                        Bytes::from("value"),
                        Duration::from_secs(3600),
                    );
                } else {
                    // 80% reads
                    let key = Bytes::from(format!("key:{}", i % 10_000));
                    black_box(store.get(&key));
                }
                i += 1;
            });
        });
    }

    group.finish();
}

/// Concurrent access through the shared lock
fn bench_concurrent(c: &mut Criterion) {
    use std::thread;

    let mut group = c.benchmark_group("concurrent");
    group.measurement_time(Duration::from_secs(10));

    for kind in POLICIES {
        group.bench_with_input(BenchmarkId::new("4_threads_mixed", kind), &kind, |b, &kind| {
            b.iter(|| {
                let store = Arc::new(CacheStore::new(20_000, kind));
                let handles: Vec<_> = (0..4)
                    .map(|t| {
                        let store = Arc::clone(&store);
                        thread::spawn(move || {
                            for i in 0..10_000 {
                                let key = Bytes::from(format!("key:{}:{}", t, i));
                                store.set(key.clone(), Bytes::from("value"));
                                store.get(&key);
                            }
                        })
                    })
                    .collect();

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(store.len());
            });
        });
    }

    group.finish();
}

/// Line framing and command parsing
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_with_ttl", |b| {
        let line = Bytes::from("SET session:42 some-token-value PX 1500");
        b.iter(|| black_box(parse_command(&line)));
    });

    group.bench_function("split_pipelined", |b| {
        let input = b"GET a\r\nGET b\r\nEXISTS c\r\nDEL d\r\n".repeat(16);
        b.iter(|| {
            let mut buf = BytesMut::from(&input[..]);
            while let Some(line) = split_line(&mut buf) {
                black_box(line);
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set,
    bench_eviction,
    bench_get,
    bench_mixed,
    bench_concurrent,
    bench_parse,
);

criterion_main!(benches);
