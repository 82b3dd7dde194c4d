use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use memfn_core::{
    default_cache_key, memoize, BoundedStore, EvictionPolicy, MemoizeConfig,
};
use serde::Serialize;
use std::hint::black_box;
use std::thread;

#[derive(Clone, Serialize)]
struct Query {
    table: String,
    limit: u32,
}

fn bench_key_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_derivation");

    group.bench_function("scalar", |b| {
        b.iter(|| default_cache_key(black_box(&(42u64,))).unwrap())
    });

    let query = Query {
        table: "orders".to_string(),
        limit: 50,
    };
    group.bench_function("structural", |b| {
        b.iter(|| default_cache_key(black_box(&query)).unwrap())
    });

    group.finish();
}

fn bench_hit_vs_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_vs_miss");

    let square = memoize(|x: u64| x * x, MemoizeConfig::default());
    square.call(7).unwrap();
    group.bench_function("hit", |b| b.iter(|| square.call(black_box(7)).unwrap()));

    group.bench_function("miss", |b| {
        b.iter(|| {
            let fresh = memoize(|x: u64| x * x, MemoizeConfig::default());
            fresh.call(black_box(7)).unwrap()
        })
    });

    group.finish();
}

fn bench_bounded_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_insert");

    for size in [10usize, 100, 1000].iter() {
        for policy in [EvictionPolicy::FIFO, EvictionPolicy::LRU, EvictionPolicy::Random] {
            let name = format!("{:?}", policy);
            group.bench_with_input(BenchmarkId::new(name, size), size, |b, &size| {
                b.iter(|| {
                    let memo = memoize(
                        |x: usize| x + 1,
                        MemoizeConfig::default().with_store(BoundedStore::new(size, policy)),
                    );
                    for i in 0..size * 2 {
                        black_box(memo.call(i).unwrap());
                    }
                });
            });
        }
    }

    group.finish();
}

fn bench_concurrent_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_hits");

    let doubled = memoize(|x: u64| x * 2, MemoizeConfig::default());
    for i in 0..100 {
        doubled.call(i).unwrap();
    }

    for threads in [2usize, 4, 8].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            threads,
            |b, &threads| {
                b.iter(|| {
                    thread::scope(|s| {
                        for _ in 0..threads {
                            s.spawn(|| {
                                for i in 0..100 {
                                    black_box(doubled.call(i).unwrap());
                                }
                            });
                        }
                    });
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_key_derivation,
    bench_hit_vs_miss,
    bench_bounded_policies,
    bench_concurrent_hits
);
criterion_main!(benches);
