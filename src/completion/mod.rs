//! Live completion state of events ("done" checkboxes)
//!
//! Stores implement [`CompletionStore`](crate::traits::CompletionStore). Watchers register a callback and get a [`Subscription`] back,
//! that unregisters the callback once dropped. This way, re-rendering the calendar does not pile up stale watchers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub mod memory;
pub use memory::MemoryCompletionStore;
pub mod rest;
pub use rest::RestCompletionStore;

/// A callback that receives the current value of a watched key
pub type WatchCallback = Box<dyn Fn(bool) + Send + Sync>;

/// A handle to a registered watcher. Dropping it stops the notifications
#[must_use = "the watcher is unregistered as soon as its subscription is dropped"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new<F: FnOnce() + Send + 'static>(cancel: F) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// A subscription that has nothing to cancel
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Stop the notifications now
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.cancel.is_some()).finish()
    }
}


type SharedCallback = Arc<dyn Fn(bool) + Send + Sync>;

#[derive(Default)]
struct RegistryData {
    next_id: u64,
    watchers: HashMap<String, Vec<(u64, SharedCallback)>>,
    values: HashMap<String, bool>,
}

/// The known values and the watchers of a store.
///
/// Cloning a registry gives another handle to the same data
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<RegistryData>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for `key`. It is called at once in case the value is known already
    pub fn watch(&self, key: &str, callback: WatchCallback) -> Subscription {
        let callback: SharedCallback = Arc::from(callback);
        let (id, current) = {
            let mut data = self.inner.lock().unwrap();
            let id = data.next_id;
            data.next_id += 1;
            data.watchers.entry(key.to_string()).or_default().push((id, Arc::clone(&callback)));
            (id, data.values.get(key).copied())
        };

        if let Some(value) = current {
            callback(value);
        }

        let registry = Arc::downgrade(&self.inner);
        let key = key.to_string();
        Subscription::new(move || {
            let inner = match registry.upgrade() {
                None => return,
                Some(i) => i,
            };
            let mut data = inner.lock().unwrap();
            let now_empty = match data.watchers.get_mut(&key) {
                None => false,
                Some(list) => {
                    list.retain(|(watcher_id, _)| *watcher_id != id);
                    list.is_empty()
                },
            };
            if now_empty {
                data.watchers.remove(&key);
            }
        })
    }

    /// The last known value of `key`
    pub fn value(&self, key: &str) -> Option<bool> {
        self.inner.lock().unwrap().values.get(key).copied()
    }

    /// Store a new value and notify the watchers of `key`
    pub fn publish(&self, key: &str, value: bool) {
        let callbacks: Vec<SharedCallback> = {
            let mut data = self.inner.lock().unwrap();
            data.values.insert(key.to_string(), value);
            data.watchers.get(key)
                .map(|list| list.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                .unwrap_or_default()
        };
        log::trace!("{} is now {} ({} watchers)", key, value, callbacks.len());

        // Callbacks are called without holding the lock, so that they can watch or publish in turn
        for callback in callbacks {
            callback(value);
        }
    }

    /// How many callbacks are currently registered, for every key
    pub fn n_watchers(&self) -> usize {
        self.inner.lock().unwrap().watchers.values().map(|list| list.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, WatchCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (count, Box::new(move |_| { c.fetch_add(1, Ordering::SeqCst); }))
    }

    #[test]
    fn watchers_are_notified_until_dropped() {
        let registry = Registry::new();
        let (count, callback) = counter();
        let subscription = registry.watch("k", callback);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        registry.publish("k", true);
        registry.publish("other", true);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(registry.n_watchers(), 1);

        drop(subscription);
        assert_eq!(registry.n_watchers(), 0);
        registry.publish("k", false);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(registry.value("k"), Some(false));
    }

    #[test]
    fn known_values_are_sent_at_once() {
        let registry = Registry::new();
        registry.publish("k", true);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let subscription = registry.watch("k", Box::new(move |v| s.lock().unwrap().push(v)));
        registry.publish("k", false);
        subscription.cancel();
        registry.publish("k", true);

        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn subscriptions_outliving_their_registry() {
        let registry = Registry::new();
        let (_count, callback) = counter();
        let subscription = registry.watch("k", callback);
        drop(registry);
        drop(subscription);
        drop(Subscription::detached());
    }
}
