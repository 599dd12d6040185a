//! Observable state holder shared by the view-state modules.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<(u64, Callback<T>)>>,
    next_token: AtomicU64,
}

/// A value container that notifies registered subscribers on every
/// replacement.
///
/// Commits replace the whole value rather than mutating it in place, so
/// observers never see a torn state. Cloning the cell yields another handle
/// to the same shared value.
pub struct StateCell<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> StateCell<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(initial),
                subscribers: Mutex::new(Vec::new()),
                next_token: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        lock_or_recover(&self.inner.value).clone()
    }

    /// Replaces the value and synchronously notifies all subscribers.
    pub fn set(&self, value: T) {
        let committed = {
            let mut current = lock_or_recover(&self.inner.value);
            *current = value;
            current.clone()
        };
        self.notify(&committed);
    }

    /// Builds a replacement from the current value and commits it. The
    /// build-and-swap happens under the value lock, so concurrent updates
    /// cannot interleave.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let committed = {
            let mut current = lock_or_recover(&self.inner.value);
            let next = f(&current);
            *current = next;
            current.clone()
        };
        self.notify(&committed);
    }

    /// Registers a callback invoked with every committed value, on the
    /// committing thread. A callback may read the cell, but must not
    /// register or cancel subscriptions.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription<T> {
        let token = self.inner.next_token.fetch_add(1, Ordering::Relaxed);
        lock_or_recover(&self.inner.subscribers).push((token, Box::new(callback)));
        Subscription {
            inner: Arc::downgrade(&self.inner),
            token,
        }
    }

    fn notify(&self, value: &T) {
        let subscribers = lock_or_recover(&self.inner.subscribers);
        for (_, callback) in subscribers.iter() {
            callback(value);
        }
    }
}

// A poisoned lock still holds a whole value because commits are whole-value
// replacements, so recovery is safe.
fn lock_or_recover<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle to a registered subscription. Cancelling, or simply dropping,
/// the handle deregisters the callback.
pub struct Subscription<T> {
    inner: Weak<Inner<T>>,
    token: u64,
}

impl<T> Subscription<T> {
    /// Deregisters the callback.
    pub fn cancel(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            lock_or_recover(&inner.subscribers).retain(|(token, _)| *token != self.token);
        }
    }
}
