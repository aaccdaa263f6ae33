//! The 6-week grid of a month, with its holidays and (filtered) events

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::calendar::{CellFlags, MonthCursor};
use crate::date::ToIsoDate;
use crate::filter::FilterState;
use crate::holiday::HolidaySet;
use crate::utils::comparison::compare_events_same_day;
use crate::utils::slug_of;
use crate::Event;

/// A grid always shows 6 full weeks, whatever the length of the month
pub const GRID_CELLS: usize = 42;

/// An event, as displayed in a day cell.
///
/// Only its description is displayed. Its source is only used for styling, and as a hint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventItem {
    /// The displayed text
    pub text: String,
    /// `cat-<slug of the source>`
    pub category_class: String,
    /// The source name, shown on demand only
    pub hint: String,
    /// The completion key
    pub key: String,
    pub done: bool,
    /// Whether the completion checkbox can be toggled (i.e. a completion store is attached)
    pub checkable: bool,
}

/// A day of the grid
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub flags: CellFlags,
    pub items: Vec<EventItem>,
}

impl DayCell {
    pub fn date_iso(&self) -> String       { self.date.to_iso_date() }
    pub fn is_holiday(&self) -> bool       { self.flags.contains(CellFlags::HOLIDAY) }
    pub fn is_today(&self) -> bool         { self.flags.contains(CellFlags::TODAY) }
    pub fn is_outside_month(&self) -> bool { self.flags.contains(CellFlags::OUTSIDE_MONTH) }
}

/// The 42 cells of a month
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    pub cursor: MonthCursor,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn title(&self) -> String {
        self.cursor.title()
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells.iter().find(|cell| cell.date == date)
    }

    /// Every visible event item, in display order
    pub fn items(&self) -> impl Iterator<Item = (&DayCell, &EventItem)> {
        self.cells.iter()
            .flat_map(|cell| cell.items.iter().map(move |item| (cell, item)))
    }

    /// Every week, as rows of 7 cells
    pub fn weeks(&self) -> std::slice::Chunks<'_, DayCell> {
        self.cells.chunks(7)
    }
}

/// What a grid is built from, apart from the month and the events
pub struct GridContext<'a> {
    pub holidays: &'a HolidaySet,
    pub filter: &'a FilterState,
    pub today: NaiveDate,
    /// Known completion values, or `None` when no completion store is attached
    pub completion: Option<&'a HashMap<String, bool>>,
}

/// Lay out a month
pub fn build_grid(cursor: MonthCursor, events: &[Event], context: &GridContext) -> MonthGrid {
    let by_date = group_by_date(events);
    let start = cursor.grid_start();

    let cells = (0..GRID_CELLS)
        .map(|offset| {
            let date = start + Duration::days(offset as i64);
            let iso = date.to_iso_date();

            let mut flags = CellFlags::empty();
            if cursor.contains(date) == false {
                flags.insert(CellFlags::OUTSIDE_MONTH);
            }
            if context.holidays.contains(&iso) {
                flags.insert(CellFlags::HOLIDAY);
            }
            if date == context.today {
                flags.insert(CellFlags::TODAY);
            }

            let items = by_date.get(&iso)
                .map(|day_events| day_events.iter()
                    .filter(|event| context.filter.matches(event))
                    .map(|event| event_item(event, context))
                    .collect())
                .unwrap_or_default();

            DayCell { date, flags, items }
        })
        .collect();

    MonthGrid { cursor, cells }
}

fn group_by_date(events: &[Event]) -> HashMap<String, Vec<&Event>> {
    let mut map: HashMap<String, Vec<&Event>> = HashMap::new();
    for event in events {
        map.entry(event.date_iso().to_iso_date()).or_default().push(event);
    }
    for list in map.values_mut() {
        list.sort_by(|a, b| compare_events_same_day(a, b));
    }
    map
}

fn event_item(event: &Event, context: &GridContext) -> EventItem {
    let done = context.completion
        .and_then(|values| values.get(event.key()).copied())
        .unwrap_or(false);

    EventItem {
        text: event.description().to_string(),
        category_class: format!("cat-{}", slug_of(event.source())),
        hint: event.source().to_string(),
        key: event.key().to_string(),
        done,
        checkable: context.completion.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grids_have_six_weeks_starting_on_sunday() {
        let holidays = HolidaySet::new();
        let filter = FilterState::default();
        let context = GridContext{ holidays: &holidays, filter: &filter, today: date(2025, 3, 10), completion: None };

        let mut cursor = MonthCursor::from_year_month(2024, 1).unwrap();
        for _ in 0..24 {
            let grid = build_grid(cursor, &[], &context);
            assert_eq!(grid.cells.len(), GRID_CELLS);
            assert_eq!(grid.cells[0].date.weekday(), Weekday::Sun);
            assert_eq!(grid.weeks().count(), 6);
            // Consecutive days
            for pair in grid.cells.windows(2) {
                assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
            }
            // Every day of the month is there, and not de-emphasized
            let in_month = grid.cells.iter().filter(|c| c.is_outside_month() == false).count();
            let month_length = (cursor.next().first_day() - cursor.first_day()).num_days() as usize;
            assert_eq!(in_month, month_length);
            cursor = cursor.next();
        }
    }

    #[test]
    fn flags() {
        let mut holidays = HolidaySet::new();
        holidays.insert("2025-03-24".to_string());
        holidays.insert("2025-04-01".to_string());
        let filter = FilterState::default();
        let context = GridContext{ holidays: &holidays, filter: &filter, today: date(2025, 3, 10), completion: None };

        let grid = build_grid(MonthCursor::from_year_month(2025, 3).unwrap(), &[], &context);
        assert_eq!(grid.cells[0].date, date(2025, 2, 23));
        assert!(grid.cells[0].is_outside_month());
        assert!(grid.cell(date(2025, 3, 24)).unwrap().is_holiday());
        assert_eq!(grid.cell(date(2025, 3, 24)).unwrap().items.len(), 0);
        // A holiday in the trailing days of the next month is flagged too
        let april_first = grid.cell(date(2025, 4, 1)).unwrap();
        assert!(april_first.is_holiday() && april_first.is_outside_month());
        assert!(grid.cell(date(2025, 3, 10)).unwrap().is_today());
        assert_eq!(grid.cells.iter().filter(|c| c.is_today()).count(), 1);
        assert_eq!(grid.cells.iter().filter(|c| c.is_holiday()).count(), 2);
    }

    #[test]
    fn items_are_sorted_and_styled() {
        let events = vec![
            Event::new("2025-03-10", "Zeta", "Eventos").unwrap(),
            Event::new("2025-03-10", "Beta", "Académico").unwrap(),
            Event::new("2025-03-10", "Alfa", "Eventos").unwrap(),
            Event::new("15/03", "Sin año", "Eventos").unwrap(),
        ];
        let holidays = HolidaySet::new();
        let filter = FilterState::default();
        let mut completion = HashMap::new();
        completion.insert(events[2].key().to_string(), true);
        let context = GridContext{ holidays: &holidays, filter: &filter, today: date(2025, 1, 1), completion: Some(&completion) };

        let grid = build_grid(MonthCursor::from_year_month(2025, 3).unwrap(), &events, &context);
        let cell = grid.cell(date(2025, 3, 10)).unwrap();
        let texts: Vec<&str> = cell.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["Beta", "Alfa", "Zeta"]);
        assert_eq!(cell.items[0].category_class, "cat-academico");
        assert_eq!(cell.items[0].hint, "Académico");
        assert!(cell.items[1].done);
        assert!(cell.items[0].done == false);
        assert!(cell.items.iter().all(|i| i.checkable));
        // Dates without a year never show up
        assert_eq!(grid.items().count(), 3);
    }
}
