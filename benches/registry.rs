use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_registry::*;
use std::sync::Arc;

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let registry = Registry::new();
    registry.bind_value(Key::of::<u64>(), 42u64).unwrap();

    // Prime the singleton
    let _ = registry.get::<u64>().unwrap();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = registry.get::<u64>().unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                let registry = Registry::new();
                registry
                    .singleton(|| ExpensiveToCreate {
                        data: (0..1000).collect(),
                    })
                    .unwrap();
                registry
            },
            |registry| {
                let v = registry.get::<ExpensiveToCreate>().unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_singleton_vs_prototype(c: &mut Criterion) {
    struct Service {
        data: [u8; 64],
    }

    let mut group = c.benchmark_group("singleton_vs_prototype");

    let singleton = Registry::new();
    singleton.singleton(|| Service { data: [0; 64] }).unwrap();
    group.bench_function("singleton_hit", |b| {
        b.iter(|| {
            let v = singleton.get::<Service>().unwrap();
            black_box(&v.data);
        })
    });

    let prototype = Registry::new();
    prototype.prototype(|| Service { data: [0; 64] }).unwrap();
    group.bench_function("prototype_create", |b| {
        b.iter(|| {
            let v = prototype.get::<Service>().unwrap();
            black_box(&v.data);
        })
    });

    group.finish();
}

fn bench_capability_scan(c: &mut Criterion) {
    trait Handler: Send + Sync {
        fn id(&self) -> usize;
    }
    struct Concrete(usize);
    impl Handler for Concrete {
        fn id(&self) -> usize {
            self.0
        }
    }

    let mut group = c.benchmark_group("capability_scan");
    for preceding in [0usize, 10, 100] {
        let registry = Registry::new();
        for i in 0..preceding {
            registry.bind_value(format!("filler.{}", i), i).unwrap();
        }
        registry
            .register(Binding::value(Concrete(7)).provides(|c| c as Arc<dyn Handler>))
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(preceding), &registry, |b, registry| {
            b.iter(|| {
                let h = registry.get::<dyn Handler>().unwrap();
                black_box(h.id());
            })
        });
    }
    group.finish();
}

fn bench_injected_call(c: &mut Criterion) {
    struct A;
    struct B;
    struct C;

    let registry = Registry::new();
    registry.singleton(|| A).unwrap();
    registry.singleton(|| B).unwrap();
    registry.singleton(|| C).unwrap();

    let mut group = c.benchmark_group("injected_call");
    group.bench_function("zero_params", |b| {
        b.iter(|| black_box(registry.invoke(|| 1u8).unwrap()))
    });
    group.bench_function("three_params", |b| {
        b.iter(|| {
            black_box(
                registry
                    .invoke(|_a: Arc<A>, _b: Arc<B>, _c: Arc<C>| 1u8)
                    .unwrap(),
            )
        })
    });
    group.bench_function("three_params_erased", |b| {
        b.iter(|| {
            black_box(
                registry
                    .call(|_a: Arc<A>, _b: Arc<B>, _c: Arc<C>| 1u8)
                    .unwrap(),
            )
        })
    });
    group.finish();
}

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");
    for count in [10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let registry = Registry::new();
                for i in 0..count {
                    registry.bind_value(format!("key.{}", i), i).unwrap();
                }
                black_box(registry.len())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_singleton_vs_prototype,
    bench_capability_scan,
    bench_injected_call,
    bench_registration
);
criterion_main!(benches);
