//! Conversion of the many date shapes found in spreadsheets into `YYYY-MM-DD` strings

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
/// Day-month-year with a four digit year. This is the only separated form that gets converted
static DMY_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4})$").unwrap());
/// Looser day-month-year form (2 to 4 digit years), only used to recognize date-looking cells
pub(crate) static DMY_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}$").unwrap());

/// Spreadsheet serial dates are only recognized in this open range (roughly years 1954 to 2146)
pub const SERIAL_RANGE: (f64, f64) = (20000.0, 90000.0);
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Something that can be turned into a canonical `YYYY-MM-DD` string
pub trait ToIsoDate {
    fn to_iso_date(&self) -> String;
}

impl ToIsoDate for NaiveDate {
    fn to_iso_date(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl ToIsoDate for str {
    /// Convert a spreadsheet cell.
    ///
    /// * `2025-03-10` is returned unchanged
    /// * `10/3/2025`, `10-03-2025` and `10.03.2025` are read as day-month-year
    /// * a number in the serial range is a day count since 1899-12-30
    /// * anything else (e.g. `15/03`, which has no year) is returned as-is, rather than being dropped
    fn to_iso_date(&self) -> String {
        let cell = self.replace('\u{FEFF}', "");
        let cell = cell.trim();
        if cell.is_empty() {
            return String::new();
        }

        if ISO_DATE.is_match(cell) {
            return cell.to_string();
        }

        if let Some(caps) = DMY_DATE.captures(cell) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            return format!("{}-{:02}-{:02}", &caps[3], month, day);
        }

        if let Some(serial) = parse_serial(cell) {
            if let Some(date) = serial_to_date(serial) {
                return date.to_iso_date();
            }
        }

        log::trace!("Leaving unrecognized date {:?} as-is", cell);
        cell.to_string()
    }
}

impl ToIsoDate for String {
    fn to_iso_date(&self) -> String {
        self.as_str().to_iso_date()
    }
}

/// Returns the number in this cell, if it is in the range of spreadsheet serial dates
pub fn parse_serial(cell: &str) -> Option<f64> {
    match cell.trim().parse::<f64>() {
        Ok(n) if n > SERIAL_RANGE.0 && n < SERIAL_RANGE.1 => Some(n),
        _ => None,
    }
}

/// Convert a spreadsheet serial date (days since 1899-12-30, UTC) to a calendar date.
///
/// The fractional part (time of day) is ignored.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * MILLIS_PER_DAY) as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
        .map(|datetime| datetime.date())
}

/// Parse a canonical `YYYY-MM-DD` string
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    if ISO_DATE.is_match(text) == false {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Whether this (trimmed) cell has the shape of a date, either ISO or day-month-year
pub fn looks_like_date(cell: &str) -> bool {
    ISO_DATE.is_match(cell) || DMY_LIKE.is_match(cell)
}
