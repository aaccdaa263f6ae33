//! Utilities to compare text the way a human reader expects
//!
//! These are used to sort events, e.g. with `sort_by`

use std::cmp::Ordering;

use crate::utils::fold;

/// Compare two strings alphabetically, ignoring case and accents first.
///
/// Strings that only differ by case or accents are then ordered by their raw contents, so that the result is a total order.
pub fn locale_cmp(left: &str, right: &str) -> Ordering {
    Ord::cmp(&fold(left), &fold(right))
        .then_with(|| Ord::cmp(left, right))
}

/// Compare two events by (date, source, description), which is the order events are displayed in
pub fn compare_events(left: &crate::Event, right: &crate::Event) -> Ordering {
    locale_cmp(left.date_iso(), right.date_iso())
        .then_with(|| compare_events_same_day(left, right))
}

/// Compare two events of the same day, by (source, description)
pub fn compare_events_same_day(left: &crate::Event, right: &crate::Event) -> Ordering {
    locale_cmp(&crate::utils::normalize(left.source()), &crate::utils::normalize(right.source()))
        .then_with(|| locale_cmp(&crate::utils::normalize(left.description()), &crate::utils::normalize(right.description())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_accents_are_ignored_first() {
        assert_eq!(locale_cmp("árbol", "Banco"), Ordering::Less);
        assert_eq!(locale_cmp("Zeta", "alfa"), Ordering::Greater);
        assert_ne!(locale_cmp("Mamá", "mama"), Ordering::Equal);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }
}
