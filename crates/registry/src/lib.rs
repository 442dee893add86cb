//! Host component registry.
//!
//! The host registers its long-lived components (the telemetry store among
//! them) under string identities; other components look them up by identity
//! and concrete type. The registry is always passed around as an explicit
//! value — there is no global instance.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Well-known identity the telemetry store is registered under.
pub const TELEMETRY_STORE_ID: &str = "telemetry_store";

/// A shareable, type-erased host component.
pub type Component = Arc<dyn Any + Send + Sync>;

/// Registry of running host components, keyed by identity.
///
/// Registration and lookup may run from any thread. Lookups are typed:
/// [`find`](Self::find) returns the component only when both the identity
/// and the concrete type match.
#[derive(Default)]
pub struct ComponentRegistry {
    components: RwLock<HashMap<String, Component>>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under `id`. A later registration with the same
    /// identity replaces the earlier one.
    pub fn register(&self, id: impl Into<String>, component: Component) {
        self.lock_write().insert(id.into(), component);
    }

    /// Remove a component. Returns whether anything was registered under `id`.
    pub fn deregister(&self, id: &str) -> bool {
        self.lock_write().remove(id).is_some()
    }

    /// Look up a component by identity and concrete type.
    ///
    /// Returns `None` when nothing is registered under `id` or when the
    /// registered component is not a `T`.
    pub fn find<T: Send + Sync + 'static>(&self, id: &str) -> Option<Arc<T>> {
        let component = self.lock_read().get(id).cloned()?;
        component.downcast::<T>().ok()
    }

    /// Identities of all registered components, unordered.
    pub fn ids(&self) -> Vec<String> {
        self.lock_read().keys().cloned().collect()
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.lock_read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.lock_read().is_empty()
    }

    fn lock_read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Component>> {
        self.components.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Component>> {
        self.components.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids = self.ids();
        ids.sort_unstable();
        f.debug_struct("ComponentRegistry").field("ids", &ids).finish()
    }
}
