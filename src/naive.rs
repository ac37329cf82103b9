use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;

use crate::SingletonError;

/// Check-then-act without any guard.
///
/// Callers that all find the cell empty each run the producer. The first
/// value to land is published and the late ones are dropped, so readers
/// still agree on a single instance even though construction side effects
/// may repeat.
pub(crate) struct Naive<T> {
    value: OnceCell<T>,
    constructions: AtomicUsize,
}

impl<T> Naive<T> {
    pub(crate) fn new() -> Self {
        Naive {
            value: OnceCell::new(),
            constructions: AtomicUsize::new(0),
        }
    }

    pub(crate) fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub(crate) fn get_or_try_init<E, F>(&self, init: F) -> Result<&T, SingletonError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let value = init().map_err(SingletonError::failed)?;
        let constructions = self.constructions.fetch_add(1, Ordering::Relaxed) + 1;
        match self.value.try_insert(value) {
            Ok(value) => Ok(value),
            Err((winner, _late)) => {
                log::warn!(
                    "naive singleton {} constructed {} times, discarding a late instance",
                    std::any::type_name::<T>(),
                    constructions
                );
                Ok(winner)
            }
        }
    }

    pub(crate) fn take(&mut self) -> Option<T> {
        *self.constructions.get_mut() = 0;
        self.value.take()
    }
}
