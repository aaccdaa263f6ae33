//! Tab-separated exports served over HTTP

use std::error::Error;

use async_trait::async_trait;
use url::Url;

use crate::source::fetch_text;
use crate::tabular::{parse_tsv, Table};
use crate::traits::EventSource;

/// A source that downloads a TSV export
pub struct TsvSource {
    name: String,
    url: Url,
    client: reqwest::Client,
}

impl TsvSource {
    pub fn new<S: ToString>(name: S, url: Url) -> Self {
        Self::with_client(name, url, reqwest::Client::new())
    }

    /// Create a source that shares an existing HTTP client (and its connection pool)
    pub fn with_client<S: ToString>(name: S, url: Url, client: reqwest::Client) -> Self {
        Self { name: name.to_string(), url, client }
    }
}

#[async_trait]
impl EventSource for TsvSource {
    fn name(&self) -> &str { &self.name }

    async fn fetch_table(&self) -> Result<Table, Box<dyn Error>> {
        let text = fetch_text(&self.client, &self.url).await?;
        Ok(parse_tsv(&text))
    }
}
