use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;

const THREADS: usize = 100;

#[test]
fn multiple_threads_can_access_to_the_same_instance() {
    let s = param(|| 42);

    thread::scope(|scope| {
        for _ in 0..10 {
            scope.spawn(|| assert_eq!(&42, s.get_instance()));
        }
    });
}

#[test]
fn simultaneous_first_access_constructs_once() {
    let constructions = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);
    let s = param(|| {
        constructions.fetch_add(1, Ordering::SeqCst);
        thread::yield_now();
        String::from("shared")
    });

    let addresses: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    s.get_instance() as *const String as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(1, constructions.load(Ordering::SeqCst));
    assert_eq!(THREADS, addresses.len());
    assert!(addresses.iter().all(|&a| a == addresses[0]));
}
