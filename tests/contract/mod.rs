use super::*;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use lazy_singleton::Producer;

#[test]
fn should_return_42() {
    let s = param(|| 42);

    assert_eq!(&42, s.get_instance());
}

#[test]
fn should_return_42_also_after_changed_backing_field_value() {
    static SEED: AtomicI32 = AtomicI32::new(42);

    let s = param(|| SEED.load(Ordering::SeqCst));

    assert_eq!(&42, s.get_instance());

    SEED.store(43, Ordering::SeqCst);
    assert_eq!(&42, s.get_instance());
}

#[test]
fn should_call_producer_just_once() {
    let sentinel = AtomicUsize::new(0);

    let p = param(|| {
        sentinel.fetch_add(1, Ordering::SeqCst);
        42
    });

    assert_eq!(&42, p.get_instance());
    p.get_instance();
    p.get_instance();
    assert_eq!(1, sentinel.load(Ordering::SeqCst));
}

#[test]
fn should_return_the_same_instance_every_time() {
    let p = param(|| vec![1, 2, 3]);

    let first = p.get_instance();
    let second = p.get_instance();
    let third = &*p;

    assert!(std::ptr::eq(first, second));
    assert!(std::ptr::eq(second, third));
}

#[test]
fn should_work_with_string_too() {
    let p = param(|| "string slice");

    assert_eq!(&"string slice", p.get_instance());
}

#[test]
fn use_producer_trait() {
    struct P;
    impl Producer for P {
        type Output = i32;

        fn produce(&self) -> Self::Output { 42 }
    }

    let p = param(P);

    assert_eq!(&42, p.get_instance());
}

#[test]
fn use_function_as_producer() {
    fn producer() -> i32 { 42 }

    let p = param(producer);

    assert_eq!(&42, p.get_instance());
}

#[test]
fn should_be_created_after_first_access() {
    let p = param(|| 42);

    p.get_instance();

    assert!(p.is_created());
    assert_eq!(Some(&42), p.get());
}

#[test]
fn reset_hands_back_the_instance_and_builds_a_new_one() {
    let sentinel = AtomicUsize::new(0);
    let mut p = param(|| sentinel.fetch_add(1, Ordering::SeqCst));
    p.get_instance();

    let taken = p.reset().unwrap();

    assert_eq!(Some(0), taken);
    assert_eq!(&1, p.get_instance());
}
