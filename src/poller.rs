//! Periodic refresh of the events
//!
//! On every tick, every source is fetched again. The calendar only needs to be rendered again when the *number* of events changed:
//! changes that keep the same number of events (e.g. a renamed event) are not detected until the next change of size.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{polling_interval, Settings};
use crate::controller::CalendarController;

pub struct Poller {
    interval: Duration,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// A poller, if polling is enabled (see [`polling_interval`])
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        polling_interval(settings.polling_ms).map(Self::new)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll once. Returns whether the calendar should be rendered again
    pub async fn tick(&self, controller: &mut CalendarController) -> bool {
        let changed = controller.refresh_events().await;
        if changed {
            log::info!("Events changed, {} events now", controller.events().len());
        }
        changed
    }

    /// Poll forever. `on_change` is called (with the controller locked) whenever the number of events changed.
    ///
    /// The controller is only locked to swap the events in, never while the sources are being fetched.
    /// A slow fetch delays the following ticks, but ticks never run concurrently.
    pub async fn run<F>(self, controller: Arc<tokio::sync::Mutex<CalendarController>>, mut on_change: F)
    where
        F: FnMut(&mut CalendarController) + Send,
    {
        let mut ticker = tokio::time::interval(self.interval);
        // The first tick completes at once, and the events have just been loaded anyway
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let aggregator = controller.lock().await.aggregator();
            let latest = aggregator.fetch_all_events().await;

            let mut controller = controller.lock().await;
            let n_events = latest.len();
            if controller.replace_events(latest) {
                log::info!("Events changed, {} events now", n_events);
                on_change(&mut *controller);
            }
        }
    }
}
