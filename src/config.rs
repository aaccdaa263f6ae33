//! Support for configuration options
//!
//! Settings are static for the lifetime of the process. They are usually read from a JSON file, see [`Settings::from_file`]

use std::error::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use url::Url;

/// The name given to holidays when the holiday sheet has no name column.
/// Feel free to override it when initing this library.
pub static DEFAULT_HOLIDAY_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Festivo".to_string())));

/// Polling intervals shorter than this are ignored (i.e. polling is disabled)
pub const MIN_POLLING_MS: u64 = 5000;

/// How often completion values are refreshed when event polling is disabled
pub const DEFAULT_COMPLETION_REFRESH_MS: u64 = 15000;

/// How a source serves its table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Tab-separated text, e.g. a "publish to the web" spreadsheet export
    Tsv,
    /// A spreadsheet "values" endpoint, returning `{"values": [[...], ...]}`
    SheetsApi,
}

impl Default for SourceFormat {
    fn default() -> Self {
        SourceFormat::Tsv
    }
}

/// A named source of events. Its name is also the category its events belong to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub url: Url,
    #[serde(default)]
    pub format: SourceFormat,
    /// A CSS color (e.g. `"#e91e63"` or `"teal"`) used to tell this source's events apart
    #[serde(default)]
    pub color: Option<String>,
}

/// Every static setting
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
    #[serde(default)]
    pub holidays_url: Option<Url>,
    #[serde(default)]
    pub polling_ms: Option<u64>,
    /// Base URL of a JSON REST key-value store. Completion checkboxes are disabled without it
    #[serde(default)]
    pub completion_store_url: Option<Url>,
    /// Labels of the category filters. Source names are used if this is empty
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Settings {
    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let settings = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };
        Ok(settings)
    }

    /// Read settings from a JSON string
    pub fn from_json(text: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_json::from_str(text)?)
    }

    /// The labels of the category filters
    pub fn category_labels(&self) -> Vec<String> {
        if self.categories.is_empty() {
            self.sources.iter().map(|s| s.name.clone()).collect()
        } else {
            self.categories.clone()
        }
    }

    /// The effective polling interval, if polling is enabled
    pub fn polling_interval(&self) -> Option<Duration> {
        polling_interval(self.polling_ms)
    }

    /// How often completion values should be refreshed, if a completion store is configured.
    ///
    /// This follows the polling interval, and does not depend on polling being enabled
    pub fn completion_refresh_interval(&self) -> Option<Duration> {
        self.completion_store_url.as_ref()?;
        Some(self.polling_interval().unwrap_or(Duration::from_millis(DEFAULT_COMPLETION_REFRESH_MS)))
    }
}

/// Polling is only enabled for intervals of at least [`MIN_POLLING_MS`]
pub fn polling_interval(millis: Option<u64>) -> Option<Duration> {
    match millis {
        Some(ms) if ms >= MIN_POLLING_MS => Some(Duration::from_millis(ms)),
        _ => None,
    }
}
