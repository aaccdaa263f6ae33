//! Category filters
//!
//! Either every category is shown ("all", the initial state), or a single one is.

use std::error::Error;

use crate::utils::slug_of;
use crate::Event;

/// A category filter control
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryPill {
    label: String,
    slug: String,
    active: bool,
}

impl CategoryPill {
    pub fn label(&self) -> &str { &self.label }
    pub fn slug(&self) -> &str  { &self.slug  }
    pub fn is_active(&self) -> bool { self.active }
}

/// The active category (if any), and the state of every category control
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pills: Vec<CategoryPill>,
    active: Option<String>,
}

impl FilterState {
    /// Create a filter, with one control for each category label. Every category is shown
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pills = labels.into_iter()
            .map(|label| CategoryPill {
                label: label.as_ref().trim().to_string(),
                slug: slug_of(label.as_ref()),
                active: false,
            })
            .collect();
        Self { pills, active: None }
    }

    pub fn pills(&self) -> &[CategoryPill] {
        &self.pills
    }

    /// The slug of the active category, `None` means "all"
    pub fn active_category(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Whether the "all" control is active
    pub fn is_all(&self) -> bool {
        self.active.is_none()
    }

    /// Show every category. Returns a status message
    pub fn select_all(&mut self) -> String {
        self.active = None;
        for pill in self.pills.iter_mut() {
            pill.active = false;
        }
        "Showing every category".to_string()
    }

    /// Show only the category matching this label (or slug). Returns a status message
    pub fn select(&mut self, label: &str) -> Result<String, Box<dyn Error>> {
        let slug = slug_of(label);
        let index = match self.pills.iter().position(|pill| pill.slug == slug) {
            None => return Err(format!("Unknown category {:?}", label).into()),
            Some(i) => i,
        };

        for (i, pill) in self.pills.iter_mut().enumerate() {
            pill.active = i == index;
        }
        self.active = Some(slug);
        Ok(format!("Filtering: {}", self.pills[index].label))
    }

    /// Whether this event is visible with the current filter
    pub fn matches(&self, event: &Event) -> bool {
        match &self.active {
            None => true,
            Some(slug) => &event.category() == slug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_selection() {
        let mut filter = FilterState::new(&["Académico", "Cumpleaños", "Eventos"]);
        assert!(filter.is_all());
        assert!(filter.pills().iter().all(|p| p.is_active() == false));

        assert_eq!(filter.select("Cumpleaños").unwrap(), "Filtering: Cumpleaños");
        assert_eq!(filter.active_category(), Some("cumpleanos"));
        let active: Vec<&str> = filter.pills().iter().filter(|p| p.is_active()).map(|p| p.slug()).collect();
        assert_eq!(active, vec!["cumpleanos"]);

        assert!(filter.select("academico").is_ok());
        let active: Vec<&str> = filter.pills().iter().filter(|p| p.is_active()).map(|p| p.label()).collect();
        assert_eq!(active, vec!["Académico"]);
        assert!(filter.is_all() == false);

        assert_eq!(filter.select_all(), "Showing every category");
        assert!(filter.is_all());
        assert!(filter.pills().iter().all(|p| p.is_active() == false));
    }

    #[test]
    fn unknown_categories_are_rejected() {
        let mut filter = FilterState::new(vec!["Eventos".to_string()]);
        assert!(filter.select("Eventos").is_ok());
        assert!(filter.select("Deportes").is_err());
        // The previous selection is kept
        assert_eq!(filter.active_category(), Some("eventos"));
    }

    #[test]
    fn events_are_matched_by_source_slug() {
        let mut filter = FilterState::new(&["Académico", "Cumpleaños"]);
        let event = Event::new("2025-03-10", "Cumple X", "Cumpleaños").unwrap();
        assert!(filter.matches(&event));
        filter.select("Académico").unwrap();
        assert_eq!(filter.matches(&event), false);
        filter.select("Cumpleaños").unwrap();
        assert!(filter.matches(&event));
    }
}
