use std::hint::black_box;

use criterion::Criterion;
use lazy_singleton::{Singleton, Strategy};

pub fn get_instance(c: &mut Criterion, strategy: Strategy) {
    let p = Singleton::new(strategy, || 42);
    p.get_instance();

    let mut group = c.benchmark_group(strategy.as_str());
    group.bench_function("get_1000", |b| {
        b.iter(|| for _ in 0..1000 { black_box(p.get_instance()); })
    });
    group.bench_function("get_100000", |b| {
        b.iter(|| for _ in 0..100000 { black_box(p.get_instance()); })
    });
    group.finish();
}
