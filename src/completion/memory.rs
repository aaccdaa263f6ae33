//! An in-process completion store

use std::error::Error;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::completion::{Registry, Subscription, WatchCallback};
use crate::mock_behaviour::MockBehaviour;
use crate::traits::CompletionStore;

/// A completion store that keeps its values in memory.
///
/// Writes can be made to fail using a [`MockBehaviour`], which is convenient to test rollbacks
#[derive(Default)]
pub struct MemoryCompletionStore {
    registry: Registry,
    behaviour: Mutex<MockBehaviour>,
}

impl MemoryCompletionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behaviour(behaviour: MockBehaviour) -> Self {
        Self { registry: Registry::new(), behaviour: Mutex::new(behaviour) }
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    /// The stored value of `key`
    pub fn value(&self, key: &str) -> Option<bool> {
        self.registry.value(key)
    }

    /// Simulate a change made by someone else
    pub fn remote_change(&self, key: &str, value: bool) {
        self.registry.publish(key, value);
    }

    /// How many watchers are registered
    pub fn n_watchers(&self) -> usize {
        self.registry.n_watchers()
    }
}

#[async_trait]
impl CompletionStore for MemoryCompletionStore {
    fn watch(&self, key: &str, callback: WatchCallback) -> Subscription {
        self.registry.watch(key, callback)
    }

    async fn set(&self, key: &str, value: bool) -> Result<(), Box<dyn Error>> {
        self.behaviour.lock().unwrap().can_set_completion()?;
        self.registry.publish(key, value);
        Ok(())
    }
}
