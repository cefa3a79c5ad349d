//! Listener list for a single event.

use std::fmt;
use std::sync::{Arc, RwLock, Weak};
use tracing::trace;

type Callback<T> = dyn Fn(&T) + Send + Sync;

/// A cloneable callback handle.
///
/// Identity is the underlying allocation: clones of one `Listener` are the
/// same listener, two `Listener::new` calls with identical closures are not.
pub struct Listener<T>(Arc<Callback<T>>);

impl<T> Listener<T> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    fn call(&self, payload: &T) {
        (self.0)(payload)
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> PartialEq for Listener<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for Listener<T> {}

impl<T> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Arc::as_ptr(&self.0))
    }
}

type Listeners<T> = RwLock<Vec<Listener<T>>>;

/// Ordered set of listeners for one event name.
pub struct Topic<T> {
    name: &'static str,
    listeners: Arc<Listeners<T>>,
}

impl<T> Topic<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register `listener`. Registering the same listener again is a no-op.
    pub fn subscribe(&self, listener: Listener<T>) -> Subscription<T> {
        {
            let mut listeners = write(&self.listeners);
            if listeners.contains(&listener) {
                trace!(event = self.name, "listener already registered");
            } else {
                listeners.push(listener.clone());
                trace!(event = self.name, count = listeners.len(), "listener registered");
            }
        }

        Subscription {
            listeners: Arc::downgrade(&self.listeners),
            listener,
        }
    }

    /// Remove `listener`; no-op if it is not registered.
    pub fn unsubscribe(&self, listener: &Listener<T>) {
        remove(&self.listeners, listener);
    }

    /// Call every listener registered at this moment, in registration order.
    ///
    /// The list is snapshotted before delivery, so listeners may subscribe or
    /// unsubscribe while running without affecting this delivery. A listener
    /// that panics aborts the delivery and the panic reaches the caller.
    ///
    /// Returns the number of listeners invoked.
    pub fn emit(&self, payload: &T) -> usize {
        let snapshot: Vec<Listener<T>> = read(&self.listeners).clone();
        trace!(event = self.name, listeners = snapshot.len(), "emitting");

        for listener in &snapshot {
            listener.call(payload);
        }
        snapshot.len()
    }

    pub fn listener_count(&self) -> usize {
        read(&self.listeners).len()
    }

    pub fn is_subscribed(&self, listener: &Listener<T>) -> bool {
        read(&self.listeners).contains(listener)
    }

    /// Drop every listener.
    pub fn clear(&self) {
        write(&self.listeners).clear();
    }
}

impl<T> fmt::Debug for Topic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.name)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle returned by [`Topic::subscribe`].
///
/// Dropping the handle leaves the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription<T> {
    listeners: Weak<Listeners<T>>,
    listener: Listener<T>,
}

impl<T> Subscription<T> {
    pub fn listener(&self) -> &Listener<T> {
        &self.listener
    }

    /// Remove the listener. A no-op when the topic is already gone.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            remove(&listeners, &self.listener);
        }
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("listener", &self.listener)
            .finish()
    }
}

fn remove<T>(listeners: &Listeners<T>, listener: &Listener<T>) {
    write(listeners).retain(|l| l != listener);
}

// Listeners never run under the lock, so a poisoned lock still holds a
// consistent Vec and is safe to keep using.
fn read<T>(lock: &Listeners<T>) -> std::sync::RwLockReadGuard<'_, Vec<Listener<T>>> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &Listeners<T>) -> std::sync::RwLockWriteGuard<'_, Vec<Listener<T>>> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
