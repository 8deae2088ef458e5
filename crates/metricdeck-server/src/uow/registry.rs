//! Capability -> constructor table.
//!
//! Built once at bootstrap, then shared read-only behind an `Arc`. Lookups
//! take no locks. Registering the same capability twice replaces the earlier
//! constructor.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use metricdeck_core::error::{MetricDeckError, Result};

use super::unit_of_work::Session;

/// A persistence capability, implemented for the trait object type that
/// describes it (`dyn DbHealthReader`, ...).
pub trait Capability: 'static {
    /// Name reported when the capability is missing.
    const NAME: &'static str;
    /// Whether instances write. Writing capabilities run under SQLite's
    /// write lock; readers never take it.
    const WRITES: bool = false;
    /// What the constructor produces for a session borrowed for `'s`.
    type Instance<'s>;
}

/// Constructor for capability `C`. Declares its dependencies through the
/// session it receives; no runtime inspection is involved.
pub type Factory<C> = for<'s> fn(&'s Session) -> <C as Capability>::Instance<'s>;

#[derive(Default)]
pub struct PersistenceRegistry {
    factories: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PersistenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `factory` as the implementation of `C`. Last write wins.
    pub fn register<C: Capability + ?Sized>(&mut self, factory: Factory<C>) -> &mut Self {
        if self
            .factories
            .insert(TypeId::of::<C>(), Box::new(factory))
            .is_some()
        {
            tracing::debug!(capability = C::NAME, "capability re-registered");
        }
        self
    }

    /// Constructor registered for `C`.
    pub fn resolve<C: Capability + ?Sized>(&self) -> Result<Factory<C>> {
        self.factories
            .get(&TypeId::of::<C>())
            .and_then(|f| f.downcast_ref::<Factory<C>>())
            .copied()
            .ok_or(MetricDeckError::Unregistered(C::NAME))
    }

    pub fn contains<C: Capability + ?Sized>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<C>())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
