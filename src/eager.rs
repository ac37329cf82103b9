use std::mem;

/// A value that exists from the moment the handle does.
pub(crate) struct Eager<T>(T);

impl<T> Eager<T> {
    pub(crate) fn new(value: T) -> Self {
        Eager(value)
    }

    pub(crate) fn get(&self) -> &T {
        &self.0
    }

    pub(crate) fn replace(&mut self, value: T) -> T {
        mem::replace(&mut self.0, value)
    }
}
