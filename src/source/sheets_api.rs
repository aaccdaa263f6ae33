//! Spreadsheet "values" endpoints, that serve a range of cells as JSON
//!
//! The expected payload looks like `{"range": "Sheet1!A1:D", "values": [["Fecha", "Evento"], [45726, "Concierto"]]}`.
//! Numbers (e.g. serial dates) are turned into text, and are handled later on by the date normalizer, just like TSV cells.

use std::error::Error;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::source::fetch_text;
use crate::tabular::Table;
use crate::traits::EventSource;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// A source that reads a range of cells from a spreadsheet JSON API
pub struct SheetsApiSource {
    name: String,
    url: Url,
    client: reqwest::Client,
}

impl SheetsApiSource {
    pub fn new<S: ToString>(name: S, url: Url) -> Self {
        Self::with_client(name, url, reqwest::Client::new())
    }

    /// Create a source that shares an existing HTTP client (and its connection pool)
    pub fn with_client<S: ToString>(name: S, url: Url, client: reqwest::Client) -> Self {
        Self { name: name.to_string(), url, client }
    }
}

#[async_trait]
impl EventSource for SheetsApiSource {
    fn name(&self) -> &str { &self.name }

    async fn fetch_table(&self) -> Result<Table, Box<dyn Error>> {
        let text = fetch_text(&self.client, &self.url).await?;
        parse_value_range(&text)
    }
}

/// Parse the JSON body of a "values" endpoint
pub fn parse_value_range(text: &str) -> Result<Table, Box<dyn Error>> {
    let range: ValueRange = serde_json::from_str(text)
        .map_err(|err| format!("Invalid value range: {}", err))?;

    let raw_rows = range.values.iter()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok(Table::from_raw_rows(raw_rows))
}

fn cell_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
