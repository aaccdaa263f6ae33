//! Month navigation and the calendar grid

pub mod grid;
pub mod render;

use chrono::{Datelike, Duration, Local, NaiveDate};

use bitflags::bitflags;

bitflags! {
    /// How a day cell is displayed
    pub struct CellFlags: u8 {
        /// The day belongs to the previous or the next month, and is de-emphasized
        const OUTSIDE_MONTH = 1;
        /// The day is a holiday
        const HOLIDAY = 2;
        /// The day is today
        const TODAY = 4;
    }
}


/// The displayed month. This is always the first day of that month
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    first_day: NaiveDate,
}

impl MonthCursor {
    /// The month that contains this date
    pub fn new(date: NaiveDate) -> Self {
        Self { first_day: date.with_day(1).unwrap_or(date) }
    }

    /// `month` is 1-based. Returns `None` for invalid months
    pub fn from_year_month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::new)
    }

    /// The current month
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn first_day(&self) -> NaiveDate { self.first_day }
    pub fn year(&self) -> i32  { self.first_day.year()  }
    pub fn month(&self) -> u32 { self.first_day.month() }

    pub fn next(&self) -> Self {
        let (year, month) = match self.month() {
            12 => (self.year() + 1, 1),
            m => (self.year(), m + 1),
        };
        Self::from_year_month(year, month).unwrap_or(*self)
    }

    pub fn previous(&self) -> Self {
        let (year, month) = match self.month() {
            1 => (self.year() - 1, 12),
            m => (self.year(), m - 1),
        };
        Self::from_year_month(year, month).unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// e.g. "March 2025"
    pub fn title(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }

    /// The first day of the grid: the last Sunday on or before the first day of the month
    pub fn grid_start(&self) -> NaiveDate {
        let offset = self.first_day.weekday().num_days_from_sunday();
        self.first_day - Duration::days(offset as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn navigation() {
        let march = MonthCursor::new(NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());
        assert_eq!(march.first_day(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(march.title(), "March 2025");

        let december = MonthCursor::from_year_month(2024, 12).unwrap();
        assert_eq!(december.next(), MonthCursor::from_year_month(2025, 1).unwrap());
        assert_eq!(december.next().previous(), december);
        assert_eq!(MonthCursor::from_year_month(2025, 1).unwrap().previous(), december);
        assert!(MonthCursor::from_year_month(2025, 13).is_none());
        assert!(march.contains(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
        assert!(march.contains(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()) == false);
    }

    #[test]
    fn grid_starts_on_sunday() {
        // March 1st, 2025 is a Saturday
        let march = MonthCursor::from_year_month(2025, 3).unwrap();
        assert_eq!(march.grid_start(), NaiveDate::from_ymd_opt(2025, 2, 23).unwrap());

        // June 1st, 2025 is a Sunday
        let june = MonthCursor::from_year_month(2025, 6).unwrap();
        assert_eq!(june.grid_start(), june.first_day());

        let mut cursor = MonthCursor::from_year_month(2023, 1).unwrap();
        for _ in 0..36 {
            assert_eq!(cursor.grid_start().weekday(), Weekday::Sun);
            assert!(cursor.first_day() - cursor.grid_start() < Duration::days(7));
            cursor = cursor.next();
        }
    }
}
