//! A completion store backed by a JSON REST key-value database
//!
//! Every value lives at `<base>/<key>.json` and is either `true` or `false`. The whole map can be read at `<base>.json`.
//! Characters that such databases forbid in keys (`. $ # [ ] /`) are escaped as `%XX`, and so is `%` itself.

use std::collections::HashMap;
use std::error::Error;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use url::Url;

use crate::completion::{Registry, Subscription, WatchCallback};
use crate::source::fetch_text;
use crate::traits::CompletionStore;

const ESCAPED_CHARS: &str = ".$#[]/%";

/// A completion store on a remote REST database
pub struct RestCompletionStore {
    base: Url,
    client: reqwest::Client,
    registry: Registry,
}

impl RestCompletionStore {
    pub fn new(base: Url) -> Self {
        Self::with_client(base, reqwest::Client::new())
    }

    pub fn with_client(base: Url, client: reqwest::Client) -> Self {
        Self { base, client, registry: Registry::new() }
    }

    /// The URL of a single value
    pub fn entry_url(&self, key: &str) -> Result<Url, Box<dyn Error>> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be used as a base URL", self.base))?
            .pop_if_empty()
            .push(&format!("{}.json", escape_key(key)));
        Ok(url)
    }

    /// The URL of the whole map
    pub fn map_url(&self) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}.json", self.base.path().trim_end_matches('/'));
        url.set_path(&path);
        url
    }

    /// Download every value, and notify the watchers of the ones that changed.
    ///
    /// Returns how many values changed
    pub async fn refresh(&self) -> Result<usize, Box<dyn Error>> {
        let text = fetch_text(&self.client, &self.map_url()).await?;
        let changes = self.apply_snapshot(&text)?;
        log::debug!("{} completion values changed remotely", changes);
        Ok(changes)
    }

    fn apply_snapshot(&self, text: &str) -> Result<usize, Box<dyn Error>> {
        let snapshot: Option<HashMap<String, Value>> = serde_json::from_str(text)
            .map_err(|err| format!("Invalid completion snapshot: {}", err))?;

        let mut changes = 0;
        for (escaped, value) in snapshot.unwrap_or_default() {
            let value = match value.as_bool() {
                None => {
                    log::warn!("Ignoring non-boolean completion value for {}", escaped);
                    continue;
                },
                Some(v) => v,
            };
            let key = unescape_key(&escaped);
            if self.registry.value(&key) != Some(value) {
                self.registry.publish(&key, value);
                changes += 1;
            }
        }
        Ok(changes)
    }
}

#[async_trait]
impl CompletionStore for RestCompletionStore {
    fn watch(&self, key: &str, callback: WatchCallback) -> Subscription {
        self.registry.watch(key, callback)
    }

    async fn set(&self, key: &str, value: bool) -> Result<(), Box<dyn Error>> {
        let url = self.entry_url(key)?;
        let response = self.client
            .put(url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(value.to_string())
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", response.status()).into());
        }

        self.registry.publish(key, value);
        Ok(())
    }
}

/// Escape the characters a key cannot contain
pub fn escape_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for c in key.chars() {
        if ESCAPED_CHARS.contains(c) {
            escaped.push_str(&format!("%{:02X}", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Reverse [`escape_key`]
pub fn unescape_key(escaped: &str) -> String {
    let mut key = String::with_capacity(escaped.len());
    let mut rest = escaped;
    while let Some(pos) = rest.find('%') {
        key.push_str(&rest[..pos]);
        let decoded = rest.get(pos + 1..pos + 3)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .map(char::from)
            .filter(|c| ESCAPED_CHARS.contains(*c));
        match decoded {
            Some(c) => {
                key.push(c);
                rest = &rest[pos + 3..];
            },
            None => {
                key.push('%');
                rest = &rest[pos + 1..];
            },
        }
    }
    key.push_str(rest);
    key
}
