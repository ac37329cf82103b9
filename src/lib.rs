//! Process-wide single-instance holders.
//!
//! A [`Singleton`] owns one value built by a [`Producer`] and hands out
//! shared references to it. When and how the one-time construction is
//! guarded is a [`Strategy`] picked when the handle is built:
//!
//! | Strategy | Built | Safe under concurrent first access |
//! |---|---|---|
//! | `Eager` | with the handle | yes |
//! | `Naive` | first access, unguarded | no, the producer may run more than once |
//! | `Locked` | first access, lock on every access | yes |
//! | `DoubleChecked` | first access, lock only while empty | yes |
//! | `Holder` | first access, through a [`OnceGuard`] | yes |
//! | `Constant` | with the handle, or from a fixed value | yes |
//!
//! Applications usually keep their singletons in a [`Registry`] built once
//! at startup and passed around by reference, with strategies taken from a
//! [`Config`].
//!
//! ```
//! use lazy_singleton::{Registry, Strategy};
//!
//! struct Pool(usize);
//!
//! let registry = Registry::builder()
//!     .register_with("pool", Strategy::Holder, || Pool(8))
//!     .build()
//!     .unwrap();
//!
//! let pool = registry.get::<Pool>().unwrap();
//! assert_eq!(8, pool.0);
//! ```

use std::convert::Infallible;

mod config;
mod double_checked;
mod eager;
mod error;
mod lock;
mod locked;
mod naive;
mod once;
mod registry;
mod singleton;
mod strategy;

pub use config::{Config, ConfigError};
pub use error::SingletonError;
pub use once::OnceGuard;
pub use registry::{BoxError, Registry, RegistryBuilder, RegistryError};
pub use singleton::{ConstantSingleton, Singleton};
pub use strategy::{ParseStrategyError, Strategy};

/// Builds the value a [`Singleton`] holds.
pub trait Producer {
    type Output;

    fn produce(&self) -> Self::Output;
}

impl<V, F: Fn() -> V> Producer for F {
    type Output = V;

    fn produce(&self) -> V {
        self()
    }
}

/// A producer whose construction may fail.
///
/// Every [`Producer`] is one that never fails.
pub trait TryProducer {
    type Output;
    type Error;

    fn try_produce(&self) -> Result<Self::Output, Self::Error>;
}

impl<P: Producer> TryProducer for P {
    type Output = P::Output;
    type Error = Infallible;

    fn try_produce(&self) -> Result<P::Output, Infallible> {
        Ok(self.produce())
    }
}

/// Turns a `Fn() -> Result<V, E>` into a [`TryProducer`].
///
/// ```
/// use lazy_singleton::{Fallible, Singleton, Strategy};
///
/// let port = Singleton::try_new(
///     Strategy::Locked,
///     Fallible(|| "8080".parse::<u16>()),
/// )
/// .unwrap();
///
/// assert_eq!(&8080, port.try_get_instance().unwrap());
/// ```
pub struct Fallible<F>(pub F);

impl<V, E, F: Fn() -> Result<V, E>> TryProducer for Fallible<F> {
    type Output = V;
    type Error = E;

    fn try_produce(&self) -> Result<V, E> {
        (self.0)()
    }
}
