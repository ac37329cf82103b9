use once_cell::sync::OnceCell;

use crate::lock::ConstructionLock;
use crate::SingletonError;

/// Lock-free once constructed; the lock only guards the first construction.
///
/// The unlocked check is an acquire load of the published value, so a hit
/// always sees a fully built instance.
pub(crate) struct DoubleChecked<T, E> {
    value: OnceCell<T>,
    lock: ConstructionLock<E>,
}

impl<T, E> DoubleChecked<T, E> {
    pub(crate) fn new() -> Self {
        DoubleChecked {
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
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        // Re-checked under the lock.
        self.lock.run(&self.value, init)
    }

    pub(crate) fn take(&mut self) -> Option<T> {
        self.lock.clear();
        self.value.take()
    }
}
