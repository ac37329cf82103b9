use once_cell::sync::OnceCell;

use crate::lock::ConstructionLock;
use crate::SingletonError;

/// Every access goes through the lock, constructed or not.
pub(crate) struct Locked<T, E> {
    value: OnceCell<T>,
    lock: ConstructionLock<E>,
}

impl<T, E> Locked<T, E> {
    pub(crate) fn new() -> Self {
        Locked {
            value: OnceCell::new(),
            lock: ConstructionLock::new(),
        }
    }

    pub(crate) fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub(crate) fn get_or_try_init<F>(&self, init: F) -> Result<&T, SingletonError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.lock.run(&self.value, init)
    }

    pub(crate) fn take(&mut self) -> Option<T> {
        self.lock.clear();
        self.value.take()
    }
}
