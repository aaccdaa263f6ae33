//! The state of a calendar view, and the operations a user can perform on it
//!
//! A [`CalendarController`] owns everything that changes over time: the displayed month, the active category,
//! the loaded events and holidays, the status line and the known completion values.

use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};

use crate::aggregator::load_progress::LoadEvent;
use crate::aggregator::{Aggregator, LoadResult};
use crate::calendar::grid::{build_grid, GridContext, MonthGrid};
use crate::calendar::MonthCursor;
use crate::completion::Subscription;
use crate::config::Settings;
use crate::filter::FilterState;
use crate::holiday::{holiday_set, Holiday, HolidaySet};
use crate::traits::CompletionStore;
use crate::Event;

/// The message shown to the user when a completion change could not be saved
pub const SAVE_FAILED_ALERT: &str = "Could not save the check";

type CompletionValues = Arc<Mutex<HashMap<String, bool>>>;

pub struct CalendarController {
    aggregator: Arc<Aggregator>,
    cursor: MonthCursor,
    filter: FilterState,

    events: Vec<Event>,
    holidays: Vec<Holiday>,
    holiday_set: HolidaySet,
    status: String,

    store: Option<Arc<dyn CompletionStore>>,
    completion: CompletionValues,
    /// Watchers of the events of the last render
    subscriptions: Vec<Subscription>,
    /// The last rendered grid. Item numbers refer to it
    last_grid: Option<MonthGrid>,
}

/// A completion change that has been applied locally, but not saved yet.
///
/// Saving does not need the controller, so that a slow store does not block the calendar.
#[must_use = "the change is only local until it is committed"]
pub struct PendingToggle {
    store: Arc<dyn CompletionStore>,
    values: CompletionValues,
    key: String,
    previous: bool,
    wanted: bool,
}

impl PendingToggle {
    pub fn key(&self) -> &str { &self.key }
    pub fn wanted(&self) -> bool { self.wanted }

    /// Save the change. In case the store refuses it, the local value is rolled back and an error is returned,
    /// that should be shown to the user.
    pub async fn commit(self) -> Result<bool, Box<dyn Error>> {
        let result = self.store.set(&self.key, self.wanted).await;
        if let Err(err) = result {
            log::error!("Unable to save the completion of {}: {}", self.key, err);
            self.values.lock().unwrap().insert(self.key.clone(), self.previous);
            return Err(format!("{} ({})", SAVE_FAILED_ALERT, err).into());
        }
        Ok(self.wanted)
    }
}

impl CalendarController {
    /// Create a controller showing the current month, with every category. Nothing is loaded yet
    pub fn new(aggregator: Aggregator, filter: FilterState, store: Option<Arc<dyn CompletionStore>>) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            cursor: MonthCursor::today(),
            filter,
            events: Vec::new(),
            holidays: Vec::new(),
            holiday_set: HolidaySet::new(),
            status: String::new(),
            store,
            completion: Arc::new(Mutex::new(HashMap::new())),
            subscriptions: Vec::new(),
            last_grid: None,
        }
    }

    pub fn from_settings(settings: &Settings, store: Option<Arc<dyn CompletionStore>>) -> Self {
        Self::new(
            Aggregator::from_settings(settings),
            FilterState::new(settings.category_labels()),
            store,
        )
    }

    pub fn cursor(&self) -> MonthCursor     { self.cursor         }
    pub fn filter(&self) -> &FilterState    { &self.filter        }
    pub fn events(&self) -> &[Event]        { &self.events        }
    pub fn holidays(&self) -> &[Holiday]    { &self.holidays      }
    pub fn status(&self) -> &str            { &self.status        }
    pub fn has_completion_store(&self) -> bool { self.store.is_some() }
    pub fn last_grid(&self) -> Option<&MonthGrid> { self.last_grid.as_ref() }

    /// A handle to the aggregator, so that sources can be fetched without keeping the controller borrowed
    pub fn aggregator(&self) -> Arc<Aggregator> {
        Arc::clone(&self.aggregator)
    }

    /// How many completion watchers are currently registered by this controller
    pub fn n_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Load every event and holiday, replacing the previous ones
    pub async fn load(&mut self) {
        self.status = LoadEvent::Started.to_string();
        let aggregator = self.aggregator();
        let result = aggregator.load().await;
        self.apply_load(result);
    }

    /// Replace the events and holidays with the ones of a load
    pub fn apply_load(&mut self, result: LoadResult) {
        if result.all_failed() {
            log::error!("Every event source failed");
        }
        self.status = result.status_line();
        self.events = result.events;
        self.holiday_set = holiday_set(&result.holidays);
        self.holidays = result.holidays;
        log::info!("{}", self.status);
    }

    /// Fetch the events again (holidays are kept).
    ///
    /// Returns whether the number of events changed, which is the only change that is detected
    pub async fn refresh_events(&mut self) -> bool {
        let aggregator = self.aggregator();
        let latest = aggregator.fetch_all_events().await;
        self.replace_events(latest)
    }

    /// Swap in freshly fetched events. Returns whether their number changed
    pub fn replace_events(&mut self, latest: Vec<Event>) -> bool {
        let changed = latest.len() != self.events.len();
        log::debug!("Refreshed events: {} -> {}", self.events.len(), latest.len());
        self.events = latest;
        changed
    }

    pub fn set_month(&mut self, cursor: MonthCursor) {
        self.cursor = cursor;
    }
    pub fn next_month(&mut self) {
        self.cursor = self.cursor.next();
    }
    pub fn previous_month(&mut self) {
        self.cursor = self.cursor.previous();
    }
    pub fn go_today(&mut self) {
        self.cursor = MonthCursor::today();
    }

    /// Show every category
    pub fn show_all(&mut self) {
        self.status = self.filter.select_all();
    }

    /// Only show the events of a category
    pub fn filter_by(&mut self, label: &str) -> Result<(), Box<dyn Error>> {
        self.status = self.filter.select(label)?;
        Ok(())
    }

    /// Lay out the current month, as of today
    pub fn render(&mut self) -> MonthGrid {
        self.render_at(Local::now().date_naive())
    }

    /// Lay out the current month.
    ///
    /// The watchers of the previous render are dropped, and the visible events are watched instead
    pub fn render_at(&mut self, today: NaiveDate) -> MonthGrid {
        self.subscriptions.clear();

        let context = GridContext {
            holidays: &self.holiday_set,
            filter: &self.filter,
            today,
            completion: None,
        };
        let mut grid = build_grid(self.cursor, &self.events, &context);

        let store = match &self.store {
            None => {
                self.last_grid = Some(grid.clone());
                return grid;
            },
            Some(s) => Arc::clone(s),
        };

        for (_, item) in grid.items() {
            let values = Arc::clone(&self.completion);
            let key = item.key.clone();
            let subscription = store.watch(&item.key, Box::new(move |done| {
                values.lock().unwrap().insert(key.clone(), done);
            }));
            self.subscriptions.push(subscription);
        }

        let values = self.completion.lock().unwrap();
        for cell in grid.cells.iter_mut() {
            for item in cell.items.iter_mut() {
                item.checkable = true;
                item.done = values.get(&item.key).copied().unwrap_or(false);
            }
        }
        drop(values);
        self.last_grid = Some(grid.clone());
        grid
    }

    /// The last known completion value of an event
    pub fn is_done(&self, key: &str) -> bool {
        self.completion.lock().unwrap().get(key).copied().unwrap_or(false)
    }

    /// Flip the completion state of an event locally, and return the change that remains to be saved
    pub fn start_toggle(&mut self, key: &str) -> Result<PendingToggle, Box<dyn Error>> {
        let store = match &self.store {
            None => return Err("Completion checkboxes are disabled: no completion store is configured".into()),
            Some(s) => Arc::clone(s),
        };

        let previous = self.is_done(key);
        let wanted = previous == false;
        self.completion.lock().unwrap().insert(key.to_string(), wanted);

        Ok(PendingToggle {
            store,
            values: Arc::clone(&self.completion),
            key: key.to_string(),
            previous,
            wanted,
        })
    }

    /// Same as [`Self::start_toggle`], for the `number`-th (1-based) item of the last rendered grid
    pub fn start_toggle_item(&mut self, number: usize) -> Result<PendingToggle, Box<dyn Error>> {
        let key = self.item_key(number)?;
        self.start_toggle(&key)
    }

    /// The completion key of the `number`-th (1-based) item of the last rendered grid
    pub fn item_key(&self, number: usize) -> Result<String, Box<dyn Error>> {
        let grid = match &self.last_grid {
            None => return Err("Nothing has been rendered yet".into()),
            Some(g) => g,
        };
        match number.checked_sub(1).and_then(|index| grid.items().nth(index)) {
            None => Err(format!("There is no event #{}", number).into()),
            Some((_, item)) => Ok(item.key.clone()),
        }
    }

    /// Flip the completion state of an event, and returns its new value.
    ///
    /// The local value is changed at once. In case the store refuses the change, it is rolled back and an error is returned,
    /// that should be shown to the user.
    pub async fn toggle(&mut self, key: &str) -> Result<bool, Box<dyn Error>> {
        self.start_toggle(key)?.commit().await
    }

    /// Toggle the `number`-th (1-based) item of the last rendered grid
    pub async fn toggle_item(&mut self, number: usize) -> Result<bool, Box<dyn Error>> {
        self.start_toggle_item(number)?.commit().await
    }
}
