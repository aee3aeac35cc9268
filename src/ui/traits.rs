use crate::{
    context::{accessor::MapContext, observable::Subscription, registry::MapState},
    core::engine::MapHandle,
    Result,
};
use std::{
    cell::{Ref, RefCell},
    fmt,
    rc::{Rc, Weak},
};

/// A component that lives on a map: marker, popup, control or layer.
///
/// The lifecycle is driven by [`Mounted`]; implementors only describe how to
/// put themselves on a live map and how to take themselves off again.
pub trait MapComponent<H: MapHandle>: 'static {
    /// Component name used in diagnostics
    const NAME: &'static str;

    /// Add the component to `map`. Called once the map is ready.
    fn attach(&mut self, map: &H) -> Result<()>;

    /// Remove the component from `map`
    fn detach(&mut self, map: &H);

    /// The map went away without a chance to detach; drop any element ids
    /// that referred to it.
    fn forget(&mut self);
}

struct Slot<H, C> {
    component: C,
    /// Live map of the registry, kept even when attaching to it failed
    live: Option<H>,
    /// Map the component is currently attached to
    map: Option<H>,
}

impl<H: MapHandle, C: MapComponent<H>> Slot<H, C> {
    fn sync(&mut self, state: &MapState<H>) {
        match state.live() {
            Some(handle) => {
                if self.map.as_ref() == Some(handle) {
                    return;
                }
                if let Some(previous) = self.map.take() {
                    log::debug!("{} moving to a new map handle", C::NAME);
                    self.component.detach(&previous);
                }
                self.live = Some(handle.clone());
                if let Err(err) = self.try_attach() {
                    log::error!("{} failed to attach: {}", C::NAME, err);
                }
            }
            None => {
                self.live = None;
                if self.map.take().is_some() {
                    log::debug!("{} lost its map", C::NAME);
                    self.component.forget();
                }
            }
        }
    }

    /// Attach to the live map unless already attached or no map is live
    fn try_attach(&mut self) -> Result<()> {
        if self.map.is_some() {
            return Ok(());
        }
        let Some(live) = self.live.clone() else {
            return Ok(());
        };
        self.component.attach(&live)?;
        log::debug!("{} attached", C::NAME);
        self.map = Some(live);
        Ok(())
    }

    fn detach(&mut self) {
        self.live = None;
        if let Some(map) = self.map.take() {
            self.component.detach(&map);
            log::debug!("{} detached", C::NAME);
        }
    }
}

/// A component mounted under a map container.
///
/// It follows the container's registry: attached while the map is ready,
/// re-attached when a new handle is published, forgotten when the registry
/// resets. Dropping it detaches the component and unsubscribes.
///
/// A failed attach leaves the component detached; the next
/// [`update`](Self::update) or [`retry_attach`](Self::retry_attach) tries
/// again against the same map.
pub struct Mounted<H: MapHandle, C: MapComponent<H>> {
    slot: Rc<RefCell<Slot<H, C>>>,
    context: MapContext<H>,
    subscription: Option<Subscription>,
}

impl<H: MapHandle, C: MapComponent<H>> Mounted<H, C> {
    /// Mount `component` under the container that owns `context`.
    ///
    /// Fails with [`MapError::Configuration`](crate::MapError::Configuration)
    /// when the context belongs to no mounted container.
    pub fn mount(context: &MapContext<H>, component: C) -> Result<Self> {
        let registry = context.require(C::NAME)?;
        let slot = Rc::new(RefCell::new(Slot {
            component,
            live: None,
            map: None,
        }));

        let weak: Weak<RefCell<Slot<H, C>>> = Rc::downgrade(&slot);
        let subscription = registry.subscribe(move |state| {
            if let Some(slot) = weak.upgrade() {
                slot.borrow_mut().sync(state);
            }
        });

        Ok(Self {
            slot,
            context: context.clone(),
            subscription: Some(subscription),
        })
    }

    /// Read the component
    pub fn component(&self) -> Ref<'_, C> {
        Ref::map(self.slot.borrow(), |slot| &slot.component)
    }

    /// Mutate the component. `f` also receives the live map when the
    /// component is attached, so changes can be pushed to it directly.
    ///
    /// A component that failed to attach to a live map is attached again
    /// afterwards; that error is returned if it still fails.
    pub fn update<R>(&self, f: impl FnOnce(&mut C, Option<&H>) -> Result<R>) -> Result<R> {
        let mut slot = self.slot.borrow_mut();
        let value = {
            let Slot { component, map, .. } = &mut *slot;
            f(component, map.as_ref())?
        };
        slot.try_attach()?;
        Ok(value)
    }

    /// Attach again after a failed attempt. Does nothing while attached or
    /// while the map is not ready.
    pub fn retry_attach(&self) -> Result<()> {
        self.slot.borrow_mut().try_attach()
    }

    /// True while the component is on a live map
    pub fn is_attached(&self) -> bool {
        self.slot.borrow().map.is_some()
    }

    /// Map the component is attached to
    pub fn map(&self) -> Option<H> {
        self.slot.borrow().map.clone()
    }

    pub fn context(&self) -> &MapContext<H> {
        &self.context
    }

    /// Detach and unsubscribe now
    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.slot.borrow_mut().detach();
    }
}

impl<H: MapHandle, C: MapComponent<H>> Drop for Mounted<H, C> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<H: MapHandle, C: MapComponent<H> + fmt::Debug> fmt::Debug for Mounted<H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mounted")
            .field("component", &self.slot.borrow().component)
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// `component.mount(&ctx)` for map components
pub trait Mountable: Sized {
    fn mount<H>(self, context: &MapContext<H>) -> Result<Mounted<H, Self>>
    where
        H: MapHandle,
        Self: MapComponent<H>,
    {
        Mounted::mount(context, self)
    }
}
