//! Per-map store of the live engine handle and its readiness flag.

use crate::context::observable::{Observable, Subscription};
use std::{cell::RefCell, fmt, rc::Rc};

/// Snapshot of a registry: the handle (if published) and whether the map has
/// finished loading. `ready` is never true while `handle` is absent.
#[derive(Clone, PartialEq)]
pub struct MapState<H> {
    pub handle: Option<H>,
    pub ready: bool,
}

impl<H> MapState<H> {
    pub fn empty() -> Self {
        Self {
            handle: None,
            ready: false,
        }
    }

    /// The handle, only once the map is ready to be mutated
    pub fn live(&self) -> Option<&H> {
        if self.ready {
            self.handle.as_ref()
        } else {
            None
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

impl<H> Default for MapState<H> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<H> fmt::Debug for MapState<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapState")
            .field("handle", &self.handle.as_ref().map(|_| ".."))
            .field("ready", &self.ready)
            .finish()
    }
}

/// Shared map handle registry.
///
/// One registry exists per mounted map container. The container is the only
/// writer; descendants read it or subscribe to it through a
/// [`MapContext`](crate::context::accessor::MapContext). The handle is opaque
/// here: the registry never calls into it.
pub struct MapRegistry<H> {
    state: Observable<MapState<H>>,
}

impl<H: Clone + 'static> MapRegistry<H> {
    pub fn new() -> Self {
        Self {
            state: Observable::new(MapState::empty()),
        }
    }

    /// Record the engine handle. Last write wins, so a remounted engine map
    /// simply replaces the previous one.
    pub fn publish(&self, handle: H) {
        log::debug!("map handle published");
        self.state.update(|state| {
            state.handle = Some(handle);
            true
        });
    }

    /// Set the readiness flag. Marking ready while no handle has been
    /// published is ignored.
    pub fn mark_ready(&self, ready: bool) {
        self.state.update(|state| {
            if state.ready == ready {
                return false;
            }
            if ready && state.handle.is_none() {
                log::warn!("mark_ready(true) ignored: no map handle has been published");
                return false;
            }
            log::debug!("map ready: {}", ready);
            state.ready = ready;
            true
        });
    }

    /// Back to `(absent, false)` with a single notification.
    pub fn reset(&self) {
        self.state.update(|state| {
            if state.handle.is_none() && !state.ready {
                return false;
            }
            log::debug!("map registry reset");
            state.ready = false;
            state.handle = None;
            true
        });
    }

    pub fn read(&self) -> MapState<H> {
        self.state.get()
    }

    pub fn handle(&self) -> Option<H> {
        self.state.with(|state| state.handle.clone())
    }

    pub fn is_ready(&self) -> bool {
        self.state.with(|state| state.ready)
    }

    /// Observe every state change. `callback` runs immediately with the
    /// current state.
    pub fn subscribe(&self, callback: impl Fn(&MapState<H>) + 'static) -> Subscription {
        self.state.subscribe(callback)
    }

    /// Run `callback` once with the handle as soon as the map is ready, which
    /// may be right now. Dropping the returned subscription before that
    /// cancels it.
    pub fn when_ready(&self, callback: impl FnOnce(&H) + 'static) -> Subscription {
        let pending = RefCell::new(Some(callback));
        self.state.subscribe(move |state| {
            if let Some(handle) = state.live() {
                let callback = pending.borrow_mut().take();
                if let Some(callback) = callback {
                    callback(handle);
                }
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.subscriber_count()
    }
}

impl<H: Clone + 'static> Default for MapRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone + 'static> fmt::Debug for MapRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapRegistry")
            .field("state", &self.read())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Registries are shared between the container and its descendants.
pub type SharedRegistry<H> = Rc<MapRegistry<H>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_starts_empty() {
        let registry: MapRegistry<&'static str> = MapRegistry::new();
        let state = registry.read();
        assert!(state.handle.is_none());
        assert!(!state.ready);
        assert!(state.live().is_none());
    }

    #[test]
    fn test_publish_then_ready() {
        let registry = MapRegistry::new();
        registry.publish("m1");
        assert_eq!(registry.read(), MapState { handle: Some("m1"), ready: false });

        registry.mark_ready(true);
        assert_eq!(registry.read(), MapState { handle: Some("m1"), ready: true });
        assert_eq!(registry.read().live(), Some(&"m1"));
    }

    #[test]
    fn test_ready_without_handle_is_ignored() {
        let registry: MapRegistry<&'static str> = MapRegistry::new();
        registry.mark_ready(true);
        assert!(!registry.is_ready());
    }

    #[test]
    fn test_publish_last_write_wins() {
        let registry = MapRegistry::new();
        registry.publish("m1");
        registry.mark_ready(true);
        registry.publish("m2");
        assert_eq!(registry.handle(), Some("m2"));
        assert!(registry.is_ready());
    }

    #[test]
    fn test_reset_notifies_once() {
        let registry = MapRegistry::new();
        registry.publish("m1");
        registry.mark_ready(true);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = registry.subscribe(move |state| sink.borrow_mut().push(state.clone()));

        registry.reset();
        registry.reset();

        assert_eq!(
            *seen.borrow(),
            vec![
                MapState { handle: Some("m1"), ready: true },
                MapState::empty(),
            ]
        );
    }

    #[test]
    fn test_mark_ready_is_idempotent() {
        let registry = MapRegistry::new();
        registry.publish(1u32);

        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let _sub = registry.subscribe(move |_| counter.set(counter.get() + 1));

        registry.mark_ready(true);
        registry.mark_ready(true);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_when_ready_fires_once() {
        let registry: MapRegistry<&'static str> = MapRegistry::new();
        let fired = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&fired);
        let _sub = registry.when_ready(move |handle| sink.borrow_mut().push(*handle));
        assert!(fired.borrow().is_empty());

        registry.publish("m1");
        assert!(fired.borrow().is_empty());
        registry.mark_ready(true);
        registry.publish("m2");

        assert_eq!(*fired.borrow(), vec!["m1"]);
    }

    #[test]
    fn test_when_ready_after_load_runs_immediately() {
        let registry = MapRegistry::new();
        registry.publish("m1");
        registry.mark_ready(true);

        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let _sub = registry.when_ready(move |_| flag.set(true));
        assert!(fired.get());
    }
}
