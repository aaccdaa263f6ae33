//! This modules fetches every configured source and merges their events into a single list
//!
//! Sources are fetched in parallel. A source that fails (network error, unexpected status code, unrecognizable columns...)
//! is logged and contributes no event, but never prevents the other sources from being loaded.

use std::error::Error;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::Settings;
use crate::holiday::{holidays_from_table, Holiday};
use crate::source::{self, TsvSource};
use crate::tabular::{infer_columns, Table};
use crate::traits::EventSource;
use crate::utils::comparison::compare_events;
use crate::Event;

pub mod load_progress;
use load_progress::LoadProgress;
use load_progress::{FeedbackSender, LoadEvent};

/// The outcome of a full load
#[derive(Clone, Debug, Default)]
pub struct LoadResult {
    /// Every event, sorted by (date, source, description)
    pub events: Vec<Event>,
    pub holidays: Vec<Holiday>,
    /// How many event sources could not be loaded
    pub failed_sources: usize,
    pub total_sources: usize,
}

impl LoadResult {
    /// Whether every configured event source failed
    pub fn all_failed(&self) -> bool {
        self.total_sources > 0 && self.failed_sources == self.total_sources
    }

    /// A message that tells the user how the load went
    pub fn status_line(&self) -> String {
        if self.all_failed() {
            return format!("Unable to load events: every source failed ({} sources)", self.total_sources);
        }
        LoadEvent::Finished{ events: self.events.len(), success: self.failed_sources == 0 }.to_string()
    }
}


/// A set of event sources (and an optional holiday source), that are loaded together
pub struct Aggregator {
    sources: Vec<Arc<dyn EventSource>>,
    holiday_source: Option<Arc<dyn EventSource>>,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn EventSource>>, holiday_source: Option<Arc<dyn EventSource>>) -> Self {
        Self { sources, holiday_source }
    }

    /// Create the adapters for every configured source. They all share a single HTTP client
    pub fn from_settings(settings: &Settings) -> Self {
        let client = reqwest::Client::new();
        let sources = settings.sources.iter()
            .map(|descriptor| source::from_descriptor(descriptor, &client))
            .collect();
        let holiday_source = settings.holidays_url.as_ref()
            .map(|url| Arc::new(TsvSource::with_client("holidays", url.clone(), client.clone())) as Arc<dyn EventSource>);

        Self::new(sources, holiday_source)
    }

    /// Fetch every source and return their merged events
    pub async fn fetch_all_events(&self) -> Vec<Event> {
        let mut progress = LoadProgress::new();
        self.run_fetch(&mut progress).await
    }

    /// Same as [`Self::fetch_all_events`], but gives feedback about the progress
    pub async fn fetch_all_events_with_feedback(&self, feedback_sender: FeedbackSender) -> Vec<Event> {
        let mut progress = LoadProgress::new_with_feedback_channel(feedback_sender);
        self.run_fetch(&mut progress).await
    }

    /// Fetch every event source and the holiday source, concurrently
    pub async fn load(&self) -> LoadResult {
        let mut progress = LoadProgress::new();
        self.run_load(&mut progress).await
    }

    /// Same as [`Self::load`], but gives feedback about the progress
    pub async fn load_with_feedback(&self, feedback_sender: FeedbackSender) -> LoadResult {
        let mut progress = LoadProgress::new_with_feedback_channel(feedback_sender);
        self.run_load(&mut progress).await
    }

    async fn run_load(&self, progress: &mut LoadProgress) -> LoadResult {
        let (events, holidays) = tokio::join!(
            self.run_fetch(progress),
            self.fetch_holidays(),
        );

        LoadResult {
            events,
            holidays,
            failed_sources: progress.n_failed(),
            total_sources: self.sources.len(),
        }
    }

    /// Returns the sorted events. Failed sources are counted in `progress`
    async fn run_fetch(&self, progress: &mut LoadProgress) -> Vec<Event> {
        progress.start(self.sources.len());

        let mut tasks = JoinSet::new();
        for source in &self.sources {
            let source = Arc::clone(source);
            tasks.spawn(async move {
                let name = source.name().to_string();
                let result = events_from_source(source.as_ref()).await
                    .map_err(|err| err.to_string());
                (name, result)
            });
        }

        let mut events = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Err(err) => progress.source_failed("<aborted task>", &err.to_string()),
                Ok((name, Err(err))) => progress.source_failed(&name, &err),
                Ok((name, Ok(source_events))) => {
                    progress.source_loaded(&name, source_events.len());
                    events.extend(source_events);
                },
            }
        }

        events.sort_by(compare_events);
        progress.finish(events.len());
        events
    }

    /// Fetch the holiday source, if any. Failures are logged and yield no holiday
    pub async fn fetch_holidays(&self) -> Vec<Holiday> {
        let source = match &self.holiday_source {
            None => return Vec::new(),
            Some(s) => s,
        };

        let table = match source.fetch_table().await {
            Err(err) => {
                log::warn!("Unable to load holidays: {}", err);
                return Vec::new();
            },
            Ok(table) => table,
        };

        match holidays_from_table(&table) {
            Err(err) => {
                log::warn!("Unable to read holidays: {}", err);
                Vec::new()
            },
            Ok(holidays) => {
                log::debug!("Loaded {} holidays", holidays.len());
                holidays
            },
        }
    }
}


/// Fetch a single source, and turn its rows into events
pub async fn events_from_source(source: &dyn EventSource) -> Result<Vec<Event>, Box<dyn Error>> {
    let table = source.fetch_table().await?;
    events_from_table(source.name(), &table)
}

/// Turn the rows of a table into events, that all belong to `source_name`.
///
/// Rows without a date or a description are skipped. This fails in case the date and description columns cannot be found.
pub fn events_from_table(source_name: &str, table: &Table) -> Result<Vec<Event>, Box<dyn Error>> {
    if table.is_empty() {
        log::info!("Source \"{}\" is empty", source_name);
        return Ok(Vec::new());
    }

    let (date_column, description_column) = match infer_columns(table).both() {
        None => return Err(format!("No date/description columns found in \"{}\". Header: {:?}", source_name, table.header()).into()),
        Some(columns) => columns,
    };

    let events = (0..table.rows().len())
        .filter_map(|row| Event::new(table.cell(row, date_column), table.cell(row, description_column), source_name))
        .collect();
    Ok(events)
}
