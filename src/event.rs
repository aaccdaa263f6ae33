//! Calendar events, as read from a spreadsheet row

use serde::{Deserialize, Serialize};

use crate::date::ToIsoDate;
use crate::utils::{normalize, slug_of};

/// A dated event.
///
/// Its `key` is a composite identity (`date|description|source`), that stays the same as long as the
/// spreadsheet row does not change. This is what completion checkboxes are stored under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    date_iso: String,
    description: String,
    source: String,
    key: String,
}

impl Event {
    /// Create an event from raw cells.
    ///
    /// The date goes through the date normalizer, the description through the text normalizer.
    /// Returns `None` in case either is empty after normalization.
    pub fn new(raw_date: &str, raw_description: &str, source: &str) -> Option<Self> {
        let date_iso = raw_date.to_iso_date();
        let description = normalize(raw_description);
        if date_iso.is_empty() || description.is_empty() {
            return None;
        }

        let key = Self::composite_key(&date_iso, &description, source);
        Some(Self {
            date_iso,
            description,
            source: source.to_string(),
            key,
        })
    }

    /// The `date|description|source` identity of an event
    pub fn composite_key(date: &str, description: &str, source: &str) -> String {
        format!("{}|{}|{}", date.to_iso_date(), normalize(description), normalize(source))
    }

    pub fn date_iso(&self) -> &str    { &self.date_iso    }
    pub fn description(&self) -> &str { &self.description }
    pub fn source(&self) -> &str      { &self.source      }
    pub fn key(&self) -> &str         { &self.key         }

    /// The slug of the category (i.e. the source) this event belongs to
    pub fn category(&self) -> String {
        slug_of(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_are_rejected() {
        assert!(Event::new("", "Ensayo", "Académico").is_none());
        assert!(Event::new("  \u{FEFF}", "Ensayo", "Académico").is_none());
        assert!(Event::new("2025-03-10", "   ", "Académico").is_none());
    }

    #[test]
    fn fields_are_normalized() {
        let event = Event::new("10/3/2025", "  Cumpleaños de Ana ", "Cumpleaños").unwrap();
        assert_eq!(event.date_iso(), "2025-03-10");
        assert_eq!(event.description(), "Cumpleanos de Ana");
        // the source name is kept exactly as configured
        assert_eq!(event.source(), "Cumpleaños");
        assert_eq!(event.key(), "2025-03-10|Cumpleanos de Ana|Cumpleanos");
        assert_eq!(event.category(), "cumpleanos");
    }

    #[test]
    fn keys_are_stable() {
        let first = Event::new("45726", "Concierto", "Eventos").unwrap();
        let second = Event::new("2025-03-10", "Concierto ", "Eventos").unwrap();
        assert_eq!(first.key(), second.key());
        assert_eq!(first, second);
    }
}
