//! Utilities to track the progression of a load

use std::fmt::{Display, Error, Formatter};

/// An event that happens during a load
#[derive(Clone, Debug, PartialEq)]
pub enum LoadEvent {
    /// Load has not started
    NotStarted,
    /// Load has just started but no source has answered yet
    Started,
    /// Load is in progress.
    InProgress{ source: String, details: String },
    /// Load is finished
    Finished{ events: usize, success: bool },
}

impl Display for LoadEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            LoadEvent::NotStarted => write!(f, "Not started"),
            LoadEvent::Started => write!(f, "Loading events..."),
            LoadEvent::InProgress{source, details} => write!(f, "[{}] {}...", source, details),
            LoadEvent::Finished{events, success} => match success {
                true => write!(f, "Ready • {} events", events),
                false => write!(f, "Ready • {} events (some sources could not be loaded)", events),
            }
        }
    }
}

impl Default for LoadEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<LoadEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<LoadEvent>;

/// Create a feeback channel, that can be used to retrieve the current progress of a load operation
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(LoadEvent::default())
}




/// Tracks a load: which sources answered, how many failed, and how many events were gathered.
///
/// Every step is logged, and forwarded to the feedback channel (if any)
pub struct LoadProgress {
    n_sources: usize,
    n_failed: usize,
    feedback_channel: Option<FeedbackSender>,
}

impl LoadProgress {
    pub fn new() -> Self {
        Self { n_sources: 0, n_failed: 0, feedback_channel: None }
    }
    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { n_sources: 0, n_failed: 0, feedback_channel: Some(channel) }
    }

    /// How many sources could not be loaded so far
    pub fn n_failed(&self) -> usize {
        self.n_failed
    }

    pub fn is_success(&self) -> bool {
        self.n_failed == 0
    }

    pub fn start(&mut self, n_sources: usize) {
        self.n_sources = n_sources;
        self.n_failed = 0;
        log::info!("Loading events from {} sources", n_sources);
        self.feedback(LoadEvent::Started);
    }

    pub fn source_loaded(&mut self, source: &str, n_events: usize) {
        log::debug!("Source \"{}\" has {} events", source, n_events);
        self.feedback(LoadEvent::InProgress{
            source: source.to_string(),
            details: format!("{} events", n_events),
        });
    }

    /// Record a source that could not be loaded. It contributes no event this time
    pub fn source_failed(&mut self, source: &str, reason: &str) {
        log::warn!("Unable to load source \"{}\": {}. It is ignored this time", source, reason);
        self.n_failed += 1;
    }

    pub fn finish(&mut self, n_events: usize) {
        log::info!("Loaded {} events ({} of {} sources failed)", n_events, self.n_failed, self.n_sources);
        self.feedback(LoadEvent::Finished{ events: n_events, success: self.is_success() });
    }

    fn feedback(&mut self, event: LoadEvent) {
        if let Some(sender) = self.feedback_channel.as_ref() {
            // Nobody listening is fine
            let _ = sender.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_counted_once() {
        let (sender, receiver) = feedback_channel();
        let mut progress = LoadProgress::new_with_feedback_channel(sender);
        progress.start(3);
        assert_eq!(*receiver.borrow(), LoadEvent::Started);

        progress.source_loaded("Académico", 2);
        assert_eq!(receiver.borrow().to_string(), "[Académico] 2 events...");
        progress.source_failed("Eventos", "HTTP 500");
        progress.source_failed("Cumpleaños", "no date column");
        assert_eq!(progress.n_failed(), 2);

        progress.finish(2);
        assert_eq!(receiver.borrow().to_string(), "Ready • 2 events (some sources could not be loaded)");

        // Starting again resets the count
        progress.start(1);
        assert!(progress.is_success());
    }
}
