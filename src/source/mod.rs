//! Adapters that fetch tables from the different kinds of sources
//!
//! Every adapter implements [`EventSource`], so that the [`Aggregator`](crate::aggregator::Aggregator) does not care where a table comes from.

use std::error::Error;
use std::sync::Arc;

use reqwest::header::CACHE_CONTROL;
use url::Url;

use crate::config::{SourceDescriptor, SourceFormat};
use crate::traits::EventSource;

pub mod tsv;
pub use tsv::TsvSource;
pub mod sheets_api;
pub use sheets_api::SheetsApiSource;
pub mod mock;
pub use mock::MockSource;

/// How many characters of an error response body are kept in error messages
const ERROR_BODY_EXCERPT: usize = 180;

/// Build the adapter described by a configured source
pub fn from_descriptor(descriptor: &SourceDescriptor, client: &reqwest::Client) -> Arc<dyn EventSource> {
    match descriptor.format {
        SourceFormat::Tsv => Arc::new(TsvSource::with_client(&descriptor.name, descriptor.url.clone(), client.clone())),
        SourceFormat::SheetsApi => Arc::new(SheetsApiSource::with_client(&descriptor.name, descriptor.url.clone(), client.clone())),
    }
}

/// GET a URL, bypassing caches, and return its body.
///
/// A non-success status code is an error, that contains the beginning of the response body.
pub(crate) async fn fetch_text(client: &reqwest::Client, url: &Url) -> Result<String, Box<dyn Error>> {
    let response = client
        .get(url.as_str())
        .header(CACHE_CONTROL, "no-store")
        .send()
        .await?;

    let status = response.status();
    if status.is_success() == false {
        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
        return Err(format!("Unexpected HTTP status code {:?} :: {}", status, excerpt).into());
    }

    let text = response.text().await?;
    log::debug!("Fetched {} bytes from {}", text.len(), url);
    Ok(text)
}
