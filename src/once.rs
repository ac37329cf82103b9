use std::fmt;

use once_cell::sync::OnceCell;
use parking_lot::{Condvar, Mutex};

use crate::SingletonError;

/// A one-time execution guard.
///
/// Runs an initializer exactly once across concurrent callers. Callers that
/// arrive while an attempt is in flight block until it finishes and then
/// share its outcome: the value, or the very same failure. A failed attempt
/// leaves the guard empty, so the next caller starts a fresh one.
pub struct OnceGuard<T, E> {
    value: OnceCell<T>,
    state: Mutex<State<E>>,
    finished: Condvar,
}

struct State<E> {
    attempt: u64,
    running: bool,
    failure: Option<(u64, SingletonError<E>)>,
}

impl<T, E> OnceGuard<T, E> {
    pub fn new() -> Self {
        OnceGuard {
            value: OnceCell::new(),
            state: Mutex::new(State {
                attempt: 0,
                running: false,
                failure: None,
            }),
            finished: Condvar::new(),
        }
    }

    /// The value, if an attempt already succeeded. Never blocks.
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn is_completed(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn get_or_try_init<F>(&self, init: F) -> Result<&T, SingletonError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let mut state = self.state.lock();
        while state.running {
            let awaited = state.attempt;
            while state.running && state.attempt == awaited {
                self.finished.wait(&mut state);
            }
            if let Some(value) = self.value.get() {
                return Ok(value);
            }
            if let Some((failed, error)) = &state.failure {
                if *failed == awaited {
                    return Err(error.clone());
                }
            }
        }
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        state.attempt += 1;
        state.running = true;
        let attempt = state.attempt;
        drop(state);

        let mut unwinding = Unwinding {
            guard: self,
            attempt,
            armed: true,
        };
        let outcome = init();
        unwinding.armed = false;

        let mut state = self.state.lock();
        state.running = false;
        let result = match outcome {
            Ok(value) => {
                state.failure = None;
                match self.value.try_insert(value) {
                    Ok(value) | Err((value, _)) => Ok(value),
                }
            }
            Err(error) => {
                let error = SingletonError::failed(error);
                state.failure = Some((attempt, error.clone()));
                Err(error)
            }
        };
        drop(state);
        self.finished.notify_all();
        result
    }

    /// Empties the guard, handing back the value if there was one.
    pub fn take(&mut self) -> Option<T> {
        self.state.get_mut().failure = None;
        self.value.take()
    }
}

impl<T, E> Default for OnceGuard<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, E> fmt::Debug for OnceGuard<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnceGuard")
            .field("value", &self.value.get())
            .finish()
    }
}

struct Unwinding<'a, T, E> {
    guard: &'a OnceGuard<T, E>,
    attempt: u64,
    armed: bool,
}

impl<T, E> Drop for Unwinding<'_, T, E> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.guard.state.lock();
        state.running = false;
        state.failure = Some((self.attempt, SingletonError::InitializerPanicked));
        drop(state);
        self.guard.finished.notify_all();
    }
}
