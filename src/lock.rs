use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, MutexGuard};

use crate::SingletonError;

/// Mutual exclusion around a construction, shared by the locked strategies.
///
/// A caller remembers how many attempts had failed before it queued on the
/// lock. If that number moved by the time it gets the lock, the attempt it
/// waited on failed and it reports that failure instead of trying again.
/// After a failure the lock is released fairly, so every caller queued
/// behind that attempt sees its failure before a new attempt can start.
pub(crate) struct ConstructionLock<E> {
    failures: AtomicU64,
    last_failure: Mutex<Option<SingletonError<E>>>,
}

impl<E> ConstructionLock<E> {
    pub(crate) fn new() -> Self {
        ConstructionLock {
            failures: AtomicU64::new(0),
            last_failure: Mutex::new(None),
        }
    }

    pub(crate) fn run<'a, T, F>(
        &self,
        cell: &'a OnceCell<T>,
        init: F,
    ) -> Result<&'a T, SingletonError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let ticket = self.failures.load(Ordering::Acquire);
        let mut last_failure = self.last_failure.lock();

        if let Some(value) = cell.get() {
            return Ok(value);
        }
        if self.failures.load(Ordering::Acquire) != ticket {
            let awaited = (*last_failure).clone();
            if let Some(error) = awaited {
                MutexGuard::unlock_fair(last_failure);
                return Err(error);
            }
        }

        let mut unwinding = Unwinding {
            failures: &self.failures,
            last_failure: &mut *last_failure,
            armed: true,
        };
        let outcome = init();
        unwinding.armed = false;

        let result = match outcome {
            Ok(value) => {
                *unwinding.last_failure = None;
                match cell.try_insert(value) {
                    Ok(value) | Err((value, _)) => Ok(value),
                }
            }
            Err(error) => {
                let error = SingletonError::failed(error);
                *unwinding.last_failure = Some(error.clone());
                self.failures.fetch_add(1, Ordering::Release);
                Err(error)
            }
        };
        drop(unwinding);
        if result.is_err() {
            // Queued callers are handed the lock in arrival order, so none
            // of them meets a newer attempt's failure before this one.
            MutexGuard::unlock_fair(last_failure);
        }
        result
    }

    pub(crate) fn clear(&mut self) {
        *self.last_failure.get_mut() = None;
    }
}

/// Publishes `InitializerPanicked` to queued callers if the producer unwinds.
struct Unwinding<'a, E> {
    failures: &'a AtomicU64,
    last_failure: &'a mut Option<SingletonError<E>>,
    armed: bool,
}

impl<E> Drop for Unwinding<'_, E> {
    fn drop(&mut self) {
        if self.armed {
            *self.last_failure = Some(SingletonError::InitializerPanicked);
            self.failures.fetch_add(1, Ordering::Release);
        }
    }
}
