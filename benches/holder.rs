use criterion::{criterion_group, criterion_main, Criterion};
use lazy_singleton::Strategy;

mod benchmarks;

fn holder(c: &mut Criterion) {
    benchmarks::get_instance(c, Strategy::Holder);
}

criterion_group!(benches, holder);
criterion_main!(benches);
