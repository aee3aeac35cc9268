//! Read path used by descendant components to reach their container's
//! registry.
//!
//! The context is passed explicitly: every component is mounted with a
//! `&MapContext`. Code migrating from the old four-function accessor maps
//! `getMap()` to [`MapRegistry::handle`], `isLoaded()` to
//! [`MapRegistry::is_ready`], and leaves `setMap`/`setLoaded` to the
//! container, which calls [`MapRegistry::publish`] and
//! [`MapRegistry::mark_ready`].

use crate::{
    context::registry::{MapRegistry, MapState, SharedRegistry},
    MapError, Result,
};
use std::{
    fmt,
    rc::{Rc, Weak},
};

/// Name of the container component, used in diagnostics.
pub const CONTAINER_NAME: &str = "Map";

/// Non-owning reference from a descendant component to the registry of its
/// enclosing map container.
pub struct MapContext<H> {
    registry: Weak<MapRegistry<H>>,
}

impl<H> Clone for MapContext<H> {
    fn clone(&self) -> Self {
        Self {
            registry: Weak::clone(&self.registry),
        }
    }
}

impl<H> Default for MapContext<H> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<H> fmt::Debug for MapContext<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapContext")
            .field("attached", &(self.registry.strong_count() > 0))
            .finish()
    }
}

impl<H> MapContext<H> {
    pub(crate) fn new(registry: &SharedRegistry<H>) -> Self {
        Self {
            registry: Rc::downgrade(registry),
        }
    }

    /// A context that belongs to no map container. Every lookup through it
    /// fails with [`MapError::Configuration`].
    pub fn detached() -> Self {
        Self {
            registry: Weak::new(),
        }
    }

    /// True while the owning container is mounted
    pub fn is_attached(&self) -> bool {
        self.registry.strong_count() > 0
    }

    /// Whether both contexts resolve to the same registry
    pub fn same_registry(&self, other: &MapContext<H>) -> bool {
        Weak::ptr_eq(&self.registry, &other.registry)
    }
}

impl<H: Clone + 'static> MapContext<H> {
    /// Resolve the enclosing container's registry.
    pub fn get_registry(&self) -> Result<SharedRegistry<H>> {
        self.require("component")
    }

    /// Same as [`get_registry`](Self::get_registry), naming the calling
    /// component in the error.
    pub fn require(&self, component: &'static str) -> Result<SharedRegistry<H>> {
        self.registry.upgrade().ok_or_else(|| MapError::Configuration {
            component,
            hint: format!(
                "Make sure your component is a child of <{}>: create it with the context \
                 returned by `MapContainer::mount`, while that container is mounted.",
                CONTAINER_NAME
            ),
        })
    }

    /// Current `(handle, ready)` pair of the enclosing container
    pub fn read(&self) -> Result<MapState<H>> {
        Ok(self.get_registry()?.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_context_fails() {
        let ctx: MapContext<u32> = MapContext::detached();
        assert!(!ctx.is_attached());

        let err = ctx.get_registry().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("no enclosing map container"));
        assert!(err.to_string().contains("<Map>"));
    }

    #[test]
    fn test_require_names_component() {
        let ctx: MapContext<u32> = MapContext::default();
        let err = ctx.require("Marker").unwrap_err();
        assert!(err.to_string().contains("Marker must be used within a <Map> component"));
    }

    #[test]
    fn test_attached_context_resolves() {
        let registry = Rc::new(MapRegistry::new());
        let ctx = MapContext::new(&registry);
        registry.publish(7u32);
        registry.mark_ready(true);

        let resolved = ctx.get_registry().unwrap();
        assert!(Rc::ptr_eq(&resolved, &registry));
        assert_eq!(ctx.read().unwrap(), MapState { handle: Some(7), ready: true });
    }

    #[test]
    fn test_context_dies_with_registry() {
        let registry = Rc::new(MapRegistry::<u32>::new());
        let ctx = MapContext::new(&registry);
        let copy = ctx.clone();
        assert!(ctx.same_registry(&copy));

        drop(registry);
        assert!(!ctx.is_attached());
        assert!(copy.read().unwrap_err().is_configuration());
    }
}
