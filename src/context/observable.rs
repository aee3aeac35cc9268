//! Subscribable value holder with replay-latest semantics.
//!
//! Everything here runs on the UI thread, so the cell is `Rc<RefCell<_>>`.
//! No borrow is held while subscriber callbacks run: a callback may read the
//! value, set it again, subscribe or unsubscribe.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: T,
    subscribers: Vec<(u64, Callback<T>)>,
    next_id: u64,
    notifying: bool,
    dirty: bool,
}

impl<T> Inner<T> {
    fn is_subscribed(&self, id: u64) -> bool {
        self.subscribers.iter().any(|(sid, _)| *sid == id)
    }
}

/// A value that notifies subscribers when it changes.
///
/// A new subscriber is called immediately with the current value, so it can
/// never miss a transition that happened before it subscribed.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                subscribers: Vec::new(),
                next_id: 0,
                notifying: false,
                dirty: false,
            })),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value and notify every subscriber
    pub fn set(&self, value: T) {
        self.inner.borrow_mut().value = value;
        self.notify();
    }

    /// Mutate the value in place. Subscribers are notified only when `f`
    /// returns true.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) {
        let changed = f(&mut self.inner.borrow_mut().value);
        if changed {
            self.notify();
        }
    }

    /// Register `callback`, calling it right away with the current value.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Callback<T> = Rc::new(callback);
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Rc::clone(&callback)));
            id
        };

        let current = self.get();
        callback(&current);

        let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.notifying {
                // A callback changed the value; the running pass restarts
                // with the newest one.
                inner.dirty = true;
                return;
            }
            inner.notifying = true;
        }
        let _guard = NotifyGuard {
            inner: &self.inner,
        };

        loop {
            let (value, callbacks) = {
                let mut inner = self.inner.borrow_mut();
                inner.dirty = false;
                let callbacks: Vec<(u64, Callback<T>)> = inner
                    .subscribers
                    .iter()
                    .map(|(id, cb)| (*id, Rc::clone(cb)))
                    .collect();
                (inner.value.clone(), callbacks)
            };

            let mut restarted = false;
            for (id, callback) in callbacks {
                {
                    let inner = self.inner.borrow();
                    if inner.dirty {
                        restarted = true;
                        break;
                    }
                    if !inner.is_subscribed(id) {
                        continue;
                    }
                }
                callback(&value);
            }

            if !restarted && !self.inner.borrow().dirty {
                break;
            }
        }
    }
}

struct NotifyGuard<'a, T> {
    inner: &'a Rc<RefCell<Inner<T>>>,
}

impl<T> Drop for NotifyGuard<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.notifying = false;
            inner.dirty = false;
        }
    }
}

/// Keeps a subscription alive. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    /// Leave the callback registered for as long as the observable lives
    pub fn detach(mut self) {
        self.cancel = None;
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
