use std::any::type_name;
use std::convert::Infallible;
use std::fmt;
use std::ops::Deref;

use crate::double_checked::DoubleChecked;
use crate::eager::Eager;
use crate::locked::Locked;
use crate::naive::Naive;
use crate::{OnceGuard, SingletonError, Strategy, TryProducer};

/// A holder of exactly one `P::Output`, built once by `P`.
///
/// Which strategy guards the construction is chosen when the handle is
/// built; the access contract is the same for all of them. Callers borrow
/// the instance from the handle, and the handle owns it until it is dropped.
///
/// ```
/// use lazy_singleton::{Singleton, Strategy};
///
/// let settings = Singleton::new(Strategy::DoubleChecked, || vec!["a", "b"]);
///
/// assert!(!settings.is_created());
/// assert_eq!(2, settings.get_instance().len());
/// assert!(std::ptr::eq(settings.get_instance(), &*settings));
/// ```
pub struct Singleton<P: TryProducer> {
    strategy: Strategy,
    slot: Slot<P>,
}

enum Slot<P: TryProducer> {
    Ready {
        cell: Eager<P::Output>,
        producer: Option<P>,
    },
    Naive {
        cell: Naive<P::Output>,
        producer: P,
    },
    Locked {
        cell: Locked<P::Output, P::Error>,
        producer: P,
    },
    DoubleChecked {
        cell: DoubleChecked<P::Output, P::Error>,
        producer: P,
    },
    Holder {
        cell: OnceGuard<P::Output, P::Error>,
        producer: P,
    },
}

pub type ConstantSingleton<T> = Singleton<fn() -> T>;

impl<P: TryProducer> Singleton<P> {
    /// Builds the handle. Eager and constant strategies run the producer
    /// right away and report its failure here.
    pub fn try_new(strategy: Strategy, producer: P) -> Result<Self, SingletonError<P::Error>> {
        let slot = match strategy {
            Strategy::Eager | Strategy::Constant => {
                let value = construct(strategy, &producer).map_err(SingletonError::failed)?;
                Slot::Ready {
                    cell: Eager::new(value),
                    producer: Some(producer),
                }
            }
            Strategy::Naive => Slot::Naive {
                cell: Naive::new(),
                producer,
            },
            Strategy::Locked => Slot::Locked {
                cell: Locked::new(),
                producer,
            },
            Strategy::DoubleChecked => Slot::DoubleChecked {
                cell: DoubleChecked::new(),
                producer,
            },
            Strategy::Holder => Slot::Holder {
                cell: OnceGuard::new(),
                producer,
            },
        };
        Ok(Singleton { strategy, slot })
    }

    /// A handle around a value that already exists. No producer ever runs.
    pub fn constant(value: P::Output) -> Self {
        Singleton {
            strategy: Strategy::Constant,
            slot: Slot::Ready {
                cell: Eager::new(value),
                producer: None,
            },
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The instance if it has been built. Never constructs.
    pub fn get(&self) -> Option<&P::Output> {
        match &self.slot {
            Slot::Ready { cell, .. } => Some(cell.get()),
            Slot::Naive { cell, .. } => cell.get(),
            Slot::Locked { cell, .. } => cell.get(),
            Slot::DoubleChecked { cell, .. } => cell.get(),
            Slot::Holder { cell, .. } => cell.get(),
        }
    }

    pub fn is_created(&self) -> bool {
        self.get().is_some()
    }

    /// Returns the shared instance, building it if this is the first access.
    ///
    /// A failed construction leaves the handle empty; the next call tries
    /// again.
    pub fn try_get_instance(&self) -> Result<&P::Output, SingletonError<P::Error>> {
        let strategy = self.strategy;
        match &self.slot {
            Slot::Ready { cell, .. } => Ok(cell.get()),
            Slot::Naive { cell, producer } => {
                cell.get_or_try_init(|| construct(strategy, producer))
            }
            Slot::Locked { cell, producer } => {
                cell.get_or_try_init(|| construct(strategy, producer))
            }
            Slot::DoubleChecked { cell, producer } => {
                cell.get_or_try_init(|| construct(strategy, producer))
            }
            Slot::Holder { cell, producer } => {
                cell.get_or_try_init(|| construct(strategy, producer))
            }
        }
    }

    /// Hands back the current instance.
    ///
    /// Lazy handles go back to the uninitialized state. Handles built from
    /// a producer at creation time are rebuilt immediately; if that fails
    /// the old instance stays. A handle made with [`Singleton::constant`]
    /// has nothing to rebuild from and is left untouched.
    pub fn reset(&mut self) -> Result<Option<P::Output>, SingletonError<P::Error>> {
        let strategy = self.strategy;
        let taken = match &mut self.slot {
            Slot::Ready {
                producer: None, ..
            } => None,
            Slot::Ready {
                cell,
                producer: Some(producer),
            } => {
                let fresh = construct(strategy, producer).map_err(SingletonError::failed)?;
                Some(cell.replace(fresh))
            }
            Slot::Naive { cell, .. } => cell.take(),
            Slot::Locked { cell, .. } => cell.take(),
            Slot::DoubleChecked { cell, .. } => cell.take(),
            Slot::Holder { cell, .. } => cell.take(),
        };
        log::debug!(
            "reset {} singleton {}",
            strategy,
            type_name::<P::Output>()
        );
        Ok(taken)
    }
}

impl<P> Singleton<P>
where
    P: TryProducer<Error = Infallible>,
{
    pub fn new(strategy: Strategy, producer: P) -> Self {
        infallible(Self::try_new(strategy, producer))
    }

    /// Returns the shared instance, building it on first access.
    ///
    /// # Panics
    ///
    /// If the producer panicked on another thread while this call waited
    /// for it.
    pub fn get_instance(&self) -> &P::Output {
        infallible(self.try_get_instance())
    }
}

impl<P> Deref for Singleton<P>
where
    P: TryProducer<Error = Infallible>,
{
    type Target = P::Output;

    fn deref(&self) -> &P::Output {
        self.get_instance()
    }
}

impl<P> fmt::Debug for Singleton<P>
where
    P: TryProducer,
    P::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Singleton")
            .field("strategy", &self.strategy)
            .field("value", &self.get())
            .finish()
    }
}

fn construct<P: TryProducer>(strategy: Strategy, producer: &P) -> Result<P::Output, P::Error> {
    log::debug!(
        "constructing {} singleton {}",
        strategy,
        type_name::<P::Output>()
    );
    let outcome = producer.try_produce();
    if outcome.is_err() {
        log::warn!(
            "construction of {} singleton {} failed",
            strategy,
            type_name::<P::Output>()
        );
    }
    outcome
}

fn infallible<T>(outcome: Result<T, SingletonError<Infallible>>) -> T {
    match outcome {
        Ok(value) => value,
        Err(SingletonError::ConstructionFailed(never)) => match *never {},
        Err(SingletonError::InitializerPanicked) => {
            panic!("singleton initializer panicked on another thread")
        }
    }
}
