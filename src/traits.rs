use std::error::Error;

use async_trait::async_trait;

use crate::completion::{Subscription, WatchCallback};
use crate::tabular::Table;

/// A named origin of tabular event data (e.g. a spreadsheet tab)
#[async_trait]
pub trait EventSource: Send + Sync {
    /// The configured name of this source. Every event it yields belongs to this category
    fn name(&self) -> &str;

    /// Fetch the current contents of this source.
    /// This may be a long process, or it can even fail, e.g. in case of a remote server
    async fn fetch_table(&self) -> Result<Table, Box<dyn Error>>;
}

/// A live key-value store for the completion state of events, keyed by [`crate::Event::key`]
#[async_trait]
pub trait CompletionStore: Send + Sync {
    /// Get notified of the value of `key`, now (if known) and every time it changes.
    ///
    /// Notifications stop when the returned [`Subscription`] is dropped
    fn watch(&self, key: &str, callback: WatchCallback) -> Subscription;

    /// Store a new value for `key`
    async fn set(&self, key: &str, value: bool) -> Result<(), Box<dyn Error>>;
}
