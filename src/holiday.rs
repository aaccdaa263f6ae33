//! Holidays, that are overlaid on the calendar

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_HOLIDAY_NAME;
use crate::date::ToIsoDate;
use crate::tabular::columns::find_keyword_column;
use crate::tabular::Table;
use crate::utils::fold;

/// A day off. Several holidays may share the same date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    date_iso: String,
    name: String,
}

impl Holiday {
    pub fn new(date_iso: String, name: String) -> Self {
        Self { date_iso, name }
    }

    pub fn date_iso(&self) -> &str { &self.date_iso }
    pub fn name(&self) -> &str     { &self.name     }
}

/// The dates that are holidays. This is the only thing the calendar grid needs to know
pub type HolidaySet = HashSet<String>;

/// Collect the dates of some holidays
pub fn holiday_set(holidays: &[Holiday]) -> HolidaySet {
    holidays.iter()
        .map(|h| h.date_iso().to_iso_date())
        .collect()
}

/// Read holidays from a table.
///
/// A column whose header contains `fecha` is required. A name column (`festivo`, `nombre` or `descripcion`) is optional,
/// every holiday is named after [`DEFAULT_HOLIDAY_NAME`] when it is missing.
pub fn holidays_from_table(table: &Table) -> Result<Vec<Holiday>, String> {
    let folded: Vec<String> = table.header().iter().map(fold).collect();
    let date_column = match find_keyword_column(&folded, &["fecha"]) {
        None => return Err(format!("No date column in holiday header {:?}", table.header())),
        Some(c) => c,
    };
    let name_column = find_keyword_column(&folded, &["festivo", "nombre", "descripcion"]);
    let default_name = DEFAULT_HOLIDAY_NAME.lock()
        .map(|name| name.clone())
        .unwrap_or_else(|_| "Festivo".to_string());

    let mut holidays = Vec::new();
    for row in 0..table.rows().len() {
        let date = table.cell(row, date_column).to_iso_date();
        if date.is_empty() {
            continue;
        }
        let name = match name_column {
            Some(c) => table.cell(row, c).trim().to_string(),
            None => default_name.clone(),
        };
        holidays.push(Holiday::new(date, name));
    }
    Ok(holidays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::parse_tsv;

    #[test]
    fn holidays_with_names() {
        let table = parse_tsv("Fecha\tFestivo\n2025-03-24\tDía de San José\n\tsin fecha\n1/5/2025\tDía del trabajo\n2025-03-24\tDuplicado\n");
        let holidays = holidays_from_table(&table).unwrap();
        assert_eq!(holidays.len(), 3);
        assert_eq!(holidays[1], Holiday::new("2025-05-01".to_string(), "Día del trabajo".to_string()));

        let set = holiday_set(&holidays);
        assert_eq!(set.len(), 2);
        assert!(set.contains("2025-03-24"));
    }

    #[test]
    fn default_name() {
        let table = parse_tsv("Fecha festiva\tOtro\n2025-01-06\tx\n");
        let holidays = holidays_from_table(&table).unwrap();
        assert_eq!(holidays, vec![Holiday::new("2025-01-06".to_string(), "Festivo".to_string())]);
    }

    #[test]
    fn date_column_is_required() {
        let table = parse_tsv("Día\tNombre\n2025-01-06\tReyes\n");
        assert!(holidays_from_table(&table).is_err());
    }
}
