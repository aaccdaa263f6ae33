//! Terminal rendering of a [`MonthGrid`]
//!
//! Events only show their description. Their source is never written out, it only gives them their color.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::Datelike;

use crate::calendar::grid::{DayCell, EventItem, MonthGrid};
use crate::config::SourceDescriptor;
use crate::utils::slug_of;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";

/// The colors of the categories, keyed by their `cat-<slug>` class
#[derive(Clone, Debug, Default)]
pub struct Palette {
    colors: HashMap<String, (u8, u8, u8)>,
    ansi: bool,
}

impl Palette {
    /// A palette without any color or terminal escape sequence
    pub fn plain() -> Self {
        Self::default()
    }

    /// Use the colors of the configured sources. Invalid colors are ignored
    pub fn from_sources(sources: &[SourceDescriptor]) -> Self {
        let mut colors = HashMap::new();
        for source in sources {
            let css = match &source.color {
                None => continue,
                Some(c) => c,
            };
            match csscolorparser::parse(css) {
                Err(err) => log::warn!("Invalid color {:?} for source {}: {}", css, source.name, err),
                Ok(color) => {
                    let rgb = (to_u8(color.r), to_u8(color.g), to_u8(color.b));
                    colors.insert(format!("cat-{}", slug_of(&source.name)), rgb);
                },
            }
        }
        Self { colors, ansi: true }
    }

    pub fn color_of(&self, category_class: &str) -> Option<(u8, u8, u8)> {
        self.colors.get(category_class).copied()
    }

    fn paint(&self, text: &str, category_class: &str, dimmed: bool) -> String {
        if self.ansi == false {
            return text.to_string();
        }
        let mut styled = String::new();
        if dimmed {
            styled.push_str(DIM);
        }
        if let Some((r, g, b)) = self.color_of(category_class) {
            let _ = write!(styled, "\x1b[38;2;{};{};{}m", r, g, b);
        }
        styled.push_str(text);
        styled.push_str(RESET);
        styled
    }

    fn emphasize(&self, text: &str, dimmed: bool) -> String {
        match (self.ansi, dimmed) {
            (false, _) => text.to_string(),
            (true, true) => format!("{}{}{}", DIM, text, RESET),
            (true, false) => format!("{}{}{}", BOLD, text, RESET),
        }
    }
}

fn to_u8(component: f64) -> u8 {
    (component.max(0.0).min(1.0) * 255.0).round() as u8
}

/// Render a month: its title, the 6 weeks, then the numbered list of visible events.
///
/// Today is shown between brackets, holidays are followed by a `*`.
pub fn render_month(grid: &MonthGrid, palette: &Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^34}", grid.title());
    let _ = writeln!(out, "{}", WEEKDAYS.iter().map(|d| format!("{:^4}", d)).collect::<Vec<_>>().join(" "));

    for week in grid.weeks() {
        let line: Vec<String> = week.iter()
            .map(|cell| {
                let text = day_label(cell);
                match cell.is_outside_month() {
                    true => palette.emphasize(&text, true),
                    false => text,
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }

    let mut items = grid.items().enumerate().peekable();
    if items.peek().is_none() {
        let _ = writeln!(out, "\n     (no events)");
    } else {
        out.push('\n');
    }
    for (index, (cell, item)) in items {
        let _ = writeln!(out, "{:>3}. {} {}  {}",
            index + 1,
            checkbox(item),
            palette.emphasize(&cell.date.format("%b %d").to_string(), cell.is_outside_month()),
            palette.paint(&item.text, &item.category_class, cell.is_outside_month()),
        );
    }

    out
}

fn day_label(cell: &DayCell) -> String {
    let (open, close) = match cell.is_today() {
        true => ('[', ']'),
        false => (' ', ' '),
    };
    let holiday = if cell.is_holiday() { '*' } else { ' ' };
    format!("{}{:>2}{}{}", open, cell.date.day(), close, holiday)
}

fn checkbox(item: &EventItem) -> &'static str {
    match (item.checkable, item.done) {
        (false, _) => "[-]",
        (true, true) => "[x]",
        (true, false) => "[ ]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use url::Url;

    use crate::calendar::grid::{build_grid, GridContext};
    use crate::calendar::MonthCursor;
    use crate::filter::FilterState;
    use crate::holiday::HolidaySet;
    use crate::Event;

    #[test]
    fn plain_rendering() {
        let events = vec![Event::new("2025-03-10", "Cumple X", "Cumpleaños").unwrap()];
        let mut holidays = HolidaySet::new();
        holidays.insert("2025-03-24".to_string());
        let filter = FilterState::default();
        let context = GridContext{
            holidays: &holidays, filter: &filter,
            today: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
            completion: None,
        };
        let grid = build_grid(MonthCursor::from_year_month(2025, 3).unwrap(), &events, &context);
        let text = render_month(&grid, &Palette::plain());

        assert!(text.contains("March 2025"));
        assert!(text.contains("[12]"));
        assert!(text.contains(" 24 *"));
        assert!(text.contains("1. [-] Mar 10  Cumple X"));
        assert!(text.contains("Cumpleaños") == false);
        // title, weekdays, 6 weeks, blank line, 1 event
        assert_eq!(text.lines().count(), 10);
    }

    #[test]
    fn empty_months() {
        let holidays = HolidaySet::new();
        let filter = FilterState::default();
        let context = GridContext{
            holidays: &holidays, filter: &filter,
            today: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
            completion: None,
        };
        let grid = build_grid(MonthCursor::from_year_month(2025, 4).unwrap(), &[], &context);
        let text = render_month(&grid, &Palette::plain());
        assert!(text.ends_with("\n     (no events)\n"));
        assert!(text.contains("1. ") == false);
    }

    #[test]
    fn palette_from_sources() {
        let sources = vec![
            SourceDescriptor{ name: "Cumpleaños".into(), url: Url::parse("https://example.com/a").unwrap(), format: Default::default(), color: Some("#ff0080".into()) },
            SourceDescriptor{ name: "Raro".into(), url: Url::parse("https://example.com/b").unwrap(), format: Default::default(), color: Some("not a color".into()) },
        ];
        let palette = Palette::from_sources(&sources);
        assert_eq!(palette.color_of("cat-cumpleanos"), Some((255, 0, 128)));
        assert_eq!(palette.color_of("cat-raro"), None);
        assert!(palette.paint("x", "cat-cumpleanos", false).contains("38;2;255;0;128"));
    }
}
