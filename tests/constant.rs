use lazy_singleton::{Producer, Singleton, Strategy};

mod contract;
mod concurrency;

fn param<P: Producer>(producer: P) -> Singleton<P> {
    Singleton::new(Strategy::Constant, producer)
}

#[test]
fn constructs_before_any_access() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let sentinel = AtomicUsize::new(0);
    let s = param(|| sentinel.fetch_add(1, Ordering::SeqCst));

    assert_eq!(1, sentinel.load(Ordering::SeqCst));
    assert!(s.is_created());
}

#[test]
fn fixed_value_never_runs_a_producer() {
    use lazy_singleton::ConstantSingleton;

    let mut s: ConstantSingleton<&str> = ConstantSingleton::constant("fixed");

    assert_eq!(Strategy::Constant, s.strategy());
    assert_eq!(&"fixed", s.get_instance());
    assert_eq!(None, s.reset().unwrap());
    assert_eq!(&"fixed", s.get_instance());
}

#[test]
fn usable_as_a_process_wide_static() {
    use lazy_singleton::ConstantSingleton;
    use once_cell::sync::Lazy;

    static GREETING: Lazy<ConstantSingleton<&'static str>> =
        Lazy::new(|| ConstantSingleton::constant("hello"));

    assert!(std::ptr::eq(GREETING.get_instance(), GREETING.get_instance()));
}
