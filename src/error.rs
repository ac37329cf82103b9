use std::sync::Arc;

use thiserror::Error;

/// Failure of a one-time construction.
///
/// The producer's error is kept behind an `Arc` so that every caller that
/// waited on the same attempt receives the very same failure.
#[derive(Debug, Error)]
pub enum SingletonError<E> {
    /// The producer returned an error. The handle stays uninitialized.
    #[error("singleton construction failed: {0}")]
    ConstructionFailed(Arc<E>),
    /// The producer panicked while this caller was waiting for it.
    #[error("singleton initializer panicked")]
    InitializerPanicked,
}

impl<E> SingletonError<E> {
    pub(crate) fn failed(error: E) -> Self {
        SingletonError::ConstructionFailed(Arc::new(error))
    }

    /// The producer's error, if construction returned one.
    pub fn cause(&self) -> Option<&E> {
        match self {
            SingletonError::ConstructionFailed(error) => Some(error),
            SingletonError::InitializerPanicked => None,
        }
    }

    /// True when both errors come from the same construction attempt.
    pub fn is_same_failure(&self, other: &Self) -> bool {
        match (self, other) {
            (SingletonError::ConstructionFailed(a), SingletonError::ConstructionFailed(b)) => {
                Arc::ptr_eq(a, b)
            }
            (SingletonError::InitializerPanicked, SingletonError::InitializerPanicked) => true,
            _ => false,
        }
    }
}

impl<E> Clone for SingletonError<E> {
    fn clone(&self) -> Self {
        match self {
            SingletonError::ConstructionFailed(error) => {
                SingletonError::ConstructionFailed(Arc::clone(error))
            }
            SingletonError::InitializerPanicked => SingletonError::InitializerPanicked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_failure() {
        let error = SingletonError::failed("boom");
        let copy = error.clone();

        assert!(error.is_same_failure(&copy));
        assert_eq!(Some(&"boom"), copy.cause());
    }

    #[test]
    fn distinct_attempts_are_not_the_same_failure() {
        let first = SingletonError::failed("boom");
        let second = SingletonError::failed("boom");

        assert!(!first.is_same_failure(&second));
    }

    #[test]
    fn display_includes_the_cause() {
        let error = SingletonError::failed("disk full");

        assert_eq!("singleton construction failed: disk full", error.to_string());
    }
}
