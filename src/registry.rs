use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::{Config, Fallible, Singleton, SingletonError, Strategy};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type SlotProducer<T> = Fallible<Box<dyn Fn() -> Result<T, BoxError> + Send + Sync>>;
type Slot<T> = Singleton<SlotProducer<T>>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no singleton registered for {type_name}")]
    NotRegistered { type_name: &'static str },
    #[error("a singleton for {type_name} is already registered")]
    AlreadyRegistered { type_name: &'static str },
    #[error("singleton `{name}` could not be constructed")]
    Construction {
        name: String,
        source: SingletonError<BoxError>,
    },
}

/// Operations the registry needs on a slot without knowing its type.
trait ErasedSlot: Send + Sync {
    fn strategy(&self) -> Strategy;
    fn reset(&mut self) -> Result<(), SingletonError<BoxError>>;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Send + Sync + 'static> ErasedSlot for Slot<T> {
    fn strategy(&self) -> Strategy {
        Singleton::strategy(self)
    }

    fn reset(&mut self) -> Result<(), SingletonError<BoxError>> {
        Singleton::reset(self).map(drop)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Entry {
    name: String,
    slot: Box<dyn ErasedSlot>,
}

/// The composition root's set of singletons, one per type.
///
/// Built once by a [`RegistryBuilder`] and handed to consumers by
/// reference. Eager slots are constructed by [`RegistryBuilder::build`].
pub struct Registry {
    entries: HashMap<TypeId, Entry>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Result<&T, RegistryError> {
        let (name, slot) = self.slot::<T>()?;
        slot.try_get_instance()
            .map_err(|source| RegistryError::Construction {
                name: name.to_string(),
                source,
            })
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn is_created<T: Send + Sync + 'static>(&self) -> Result<bool, RegistryError> {
        Ok(self.slot::<T>()?.1.is_created())
    }

    pub fn strategy_of<T: Send + Sync + 'static>(&self) -> Result<Strategy, RegistryError> {
        Ok(self.slot::<T>()?.1.strategy())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every slot to its freshly built state.
    ///
    /// Every slot is reset even when one fails to rebuild; the first
    /// failure is reported once all of them have been visited.
    pub fn reset(&mut self) -> Result<(), RegistryError> {
        let mut first_failure = None;
        for entry in self.entries.values_mut() {
            if let Err(source) = entry.slot.reset() {
                log::warn!("registry slot `{}` failed to rebuild", entry.name);
                first_failure.get_or_insert(RegistryError::Construction {
                    name: entry.name.clone(),
                    source,
                });
            }
        }
        log::debug!("reset {} registry slots", self.entries.len());
        first_failure.map_or(Ok(()), Err)
    }

    /// Replaces the slot for `T` with a fixed value, registering it if absent.
    pub fn substitute<T: Send + Sync + 'static>(&mut self, value: T) {
        let name = self
            .entries
            .remove(&TypeId::of::<T>())
            .map(|entry| entry.name)
            .unwrap_or_else(|| type_name::<T>().to_string());
        log::debug!("substituting registry slot `{}`", name);
        self.entries.insert(
            TypeId::of::<T>(),
            Entry {
                name,
                slot: Box::new(Slot::<T>::constant(value)),
            },
        );
    }

    fn slot<T: Send + Sync + 'static>(&self) -> Result<(&str, &Slot<T>), RegistryError> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| {
                let slot = entry.slot.as_any().downcast_ref::<Slot<T>>()?;
                Some((entry.name.as_str(), slot))
            })
            .ok_or(RegistryError::NotRegistered {
                type_name: type_name::<T>(),
            })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut slots = f.debug_map();
        for entry in self.entries.values() {
            slots.entry(&entry.name, &entry.slot.strategy());
        }
        slots.finish()
    }
}

type Build = Box<dyn FnOnce(Strategy) -> Result<Box<dyn ErasedSlot>, SingletonError<BoxError>>>;

struct Pending {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    strategy: Option<Strategy>,
    build: Build,
}

/// Collects registrations, then builds the [`Registry`] in one go.
#[derive(Default)]
pub struct RegistryBuilder {
    config: Config,
    pending: Vec<Pending>,
}

impl RegistryBuilder {
    /// Strategies for slots registered without an explicit one.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn register<T, F>(self, name: impl Into<String>, producer: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.push::<T, _>(name.into(), None, move || Ok(producer()))
    }

    pub fn register_with<T, F>(self, name: impl Into<String>, strategy: Strategy, producer: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.push::<T, _>(name.into(), Some(strategy), move || Ok(producer()))
    }

    pub fn register_fallible<T, E, F>(self, name: impl Into<String>, producer: F) -> Self
    where
        T: Send + Sync + 'static,
        E: Into<BoxError> + 'static,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        self.push::<T, _>(name.into(), None, move || producer().map_err(Into::into))
    }

    pub fn register_constant<T>(mut self, name: impl Into<String>, value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.pending.push(Pending {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            strategy: Some(Strategy::Constant),
            build: Box::new(move |_| Ok(Box::new(Slot::<T>::constant(value)) as Box<dyn ErasedSlot>)),
        });
        self
    }

    fn push<T, F>(mut self, name: String, strategy: Option<Strategy>, producer: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let boxed: Box<dyn Fn() -> Result<T, BoxError> + Send + Sync> = Box::new(producer);
        let producer: SlotProducer<T> = Fallible(boxed);
        self.pending.push(Pending {
            name,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            strategy,
            build: Box::new(move |strategy| {
                Ok(Box::new(Slot::<T>::try_new(strategy, producer)?) as Box<dyn ErasedSlot>)
            }),
        });
        self
    }

    /// Builds every slot. Eager and constant slots construct here.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut entries = HashMap::with_capacity(self.pending.len());
        for pending in self.pending {
            if entries.contains_key(&pending.type_id) {
                return Err(RegistryError::AlreadyRegistered {
                    type_name: pending.type_name,
                });
            }
            let strategy = pending
                .strategy
                .unwrap_or_else(|| self.config.strategy_for(&pending.name));
            log::debug!("registering `{}` as {} singleton", pending.name, strategy);
            let slot = (pending.build)(strategy).map_err(|source| RegistryError::Construction {
                name: pending.name.clone(),
                source,
            })?;
            entries.insert(
                pending.type_id,
                Entry {
                    name: pending.name,
                    slot,
                },
            );
        }
        log::debug!("built registry with {} slots", entries.len());
        Ok(Registry { entries })
    }
}
