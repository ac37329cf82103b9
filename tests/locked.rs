use lazy_singleton::{Producer, Singleton, Strategy};

mod contract;
mod concurrency;

fn param<P: Producer>(producer: P) -> Singleton<P> {
    Singleton::new(Strategy::Locked, producer)
}
