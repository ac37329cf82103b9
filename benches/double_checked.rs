use criterion::{criterion_group, criterion_main, Criterion};
use lazy_singleton::Strategy;

mod benchmarks;

fn double_checked(c: &mut Criterion) {
    benchmarks::get_instance(c, Strategy::DoubleChecked);
}

criterion_group!(benches, double_checked);
criterion_main!(benches);
