//! Guessing which column of a [`Table`] holds the event date, and which holds its description
//!
//! Header labels are tried first, against a list of keywords. \
//! If no header matches, the contents of the first rows are scored instead.

use crate::date::{looks_like_date, parse_serial, DMY_LIKE, ISO_DATE};
use crate::tabular::Table;
use crate::utils::fold;

/// How many data rows are scanned when scoring columns by their contents
pub const SCANNED_ROWS: usize = 30;

/// Header keywords (folded) that denote a date column
pub const DATE_KEYWORDS: &[&str] = &["fecha", "dia ", "día", "nacimiento", "cumple"];

/// Header keywords (folded) that denote a description column
pub const DESCRIPTION_KEYWORDS: &[&str] = &[
    "activ", "evento", "detalle", "descrip", "tarea", "asunto",
    "titulo", "título", "nombre", "cumplean", "persona", "cliente",
];

/// The result of a column inference. `None` means no suitable column has been found
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnGuess {
    pub date: Option<usize>,
    pub description: Option<usize>,
}

impl ColumnGuess {
    /// Returns `(date, description)` only if both columns have been found
    pub fn both(&self) -> Option<(usize, usize)> {
        match (self.date, self.description) {
            (Some(d), Some(desc)) => Some((d, desc)),
            _ => None,
        }
    }
}

/// Find the date and description columns of a table
pub fn infer_columns(table: &Table) -> ColumnGuess {
    let folded: Vec<String> = table.header().iter().map(fold).collect();

    let date = match find_keyword_column(&folded, DATE_KEYWORDS) {
        Some(c) => Some(c),
        None => best_date_column(table),
    };

    let description = match find_keyword_column(&folded, DESCRIPTION_KEYWORDS) {
        Some(c) => Some(c),
        None => best_description_column(table, date),
    };

    log::debug!("Inferred columns {:?} for header {:?}", (date, description), table.header());
    ColumnGuess { date, description }
}

/// Index of the first (folded) label that contains any of the keywords
pub fn find_keyword_column(folded_labels: &[String], keywords: &[&str]) -> Option<usize> {
    folded_labels.iter()
        .position(|label| keywords.iter().any(|kw| label.contains(kw)))
}

/// Score every column by how much its cells look like dates
fn best_date_column(table: &Table) -> Option<usize> {
    best_column(table, None, date_score)
}

/// Score every column (but the date one) by how much text it holds
fn best_description_column(table: &Table, date_column: Option<usize>) -> Option<usize> {
    best_column(table, date_column, description_score)
}

fn best_column<F>(table: &Table, skipped: Option<usize>, cell_score: F) -> Option<usize>
where
    F: Fn(&str) -> usize,
{
    let scanned = table.rows().len().min(SCANNED_ROWS);
    let mut best: Option<(usize, usize)> = None;

    for column in 0..table.header().len() {
        if Some(column) == skipped {
            continue;
        }
        let score: usize = (0..scanned)
            .map(|row| table.cell(row, column).trim())
            .filter(|cell| cell.is_empty() == false)
            .map(|cell| cell_score(cell))
            .sum();

        // Strict comparison: the first column to reach the best score wins
        if score > best.map(|(_, s)| s).unwrap_or(0) {
            best = Some((column, score));
        }
    }

    best.map(|(column, _)| column)
}

fn date_score(cell: &str) -> usize {
    if ISO_DATE.is_match(cell) {
        3
    } else if DMY_LIKE.is_match(cell) {
        2
    } else if parse_serial(cell).is_some() {
        1
    } else {
        0
    }
}

fn description_score(cell: &str) -> usize {
    let len = cell.chars().count();
    if len < 2 || looks_like_date(cell) {
        return 0;
    }
    len.min(8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::parse_tsv;

    fn table(header: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            header.iter().map(|s| s.to_string()).collect(),
            rows.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect(),
        )
    }

    #[test]
    fn keywords_win_regardless_of_content() {
        let t = table(
            &["Notas", "Fecha de entrega", "Código", "Título"],
            &[&["una nota larga", "no es fecha", "2025-01-01", "x"]],
        );
        assert_eq!(infer_columns(&t), ColumnGuess{ date: Some(1), description: Some(3) });
    }

    #[test]
    fn first_keyword_column_wins() {
        let t = table(&["Cumpleaños", "Nombre", "Fecha nacimiento", "Persona"], &[]);
        let guess = infer_columns(&t);
        // "cumpleanos" contains both "cumple" and "cumplean"
        assert_eq!(guess, ColumnGuess{ date: Some(0), description: Some(0) });

        let t = table(&["Quién", "Nacimiento", "Nombre completo"], &[]);
        assert_eq!(infer_columns(&t), ColumnGuess{ date: Some(1), description: Some(2) });
    }

    #[test]
    fn every_date_keyword_is_recognized() {
        for label in &["FECHA", "Dia del evento", "Nacimiento", "Cumple"] {
            let t = table(&["col a", *label], &[]);
            assert_eq!(infer_columns(&t).date, Some(1), "label {:?}", label);
        }
        // "dia" is only a keyword when followed by a space
        let t = table(&["Diario"], &[]);
        assert_eq!(infer_columns(&t).date, None);
    }

    #[test]
    fn every_description_keyword_is_recognized() {
        for label in &["Actividad", "Evento", "Detalles", "Descripción", "Tarea", "Asunto",
                       "Titulo", "Nombre", "Cumpleañero", "Persona", "Cliente"] {
            let t = table(&["col a", *label], &[]);
            assert_eq!(infer_columns(&t).description, Some(1), "label {:?}", label);
        }
    }

    #[test]
    fn iso_column_is_found_by_content() {
        for date_column in 0..4 {
            let header = ["a", "b", "c", "d"];
            let rows: Vec<Vec<String>> = (1..=5)
                .map(|day| (0..4)
                    .map(|c| if c == date_column { format!("2025-03-{:02}", day) } else { format!("texto {}", c) })
                    .collect())
                .collect();
            let t = Table::new(header.iter().map(|s| s.to_string()).collect(), rows);
            assert_eq!(infer_columns(&t).date, Some(date_column));
            assert_ne!(infer_columns(&t).description, Some(date_column));
        }
    }

    #[test]
    fn content_scores() {
        // ISO (3 points) beats day-month-year (2 points), which beats serial numbers (1 point)
        let t = table(
            &["x", "y", "z"],
            &[&["45292", "1/1/24", "2024-01-01"], &["45293", "2/1/24", ""]],
        );
        assert_eq!(infer_columns(&t).date, Some(1));

        let t = table(&["x", "y"], &[&["45292", "1/1/2024"]]);
        assert_eq!(infer_columns(&t).date, Some(1));

        let t = table(&["x", "y"], &[&["12", "hola"], &["99999", "chao"]]);
        assert_eq!(infer_columns(&t).date, None);
    }

    #[test]
    fn ties_go_to_the_first_column() {
        let t = table(&["x", "y"], &[&["2025-01-01", "2025-01-02"]]);
        assert_eq!(infer_columns(&t).date, Some(0));
    }

    #[test]
    fn description_fallback_prefers_text() {
        let t = table(
            &["c1", "c2", "c3", "c4"],
            &[
                &["2025-01-01", "a", "Ensayo general de coro", "ok"],
                &["2025-01-02", "b", "Concierto", "12/12/2024"],
            ],
        );
        // c2 only has single chars, c3 scores 8 + 8, c4 scores 2
        assert_eq!(infer_columns(&t), ColumnGuess{ date: Some(0), description: Some(2) });
    }

    #[test]
    fn only_thirty_rows_are_scanned() {
        let mut text = String::from("a\tb\n");
        for _ in 0..30 {
            text.push_str("xx\t\n");
        }
        for _ in 0..50 {
            text.push_str("\tlonger text\n");
        }
        let t = parse_tsv(&text);
        assert_eq!(infer_columns(&t).description, Some(0));
    }

    #[test]
    fn nothing_found() {
        let t = table(&["a", "b"], &[&["x", "y"]]);
        let guess = infer_columns(&t);
        assert_eq!(guess.date, None);
        assert_eq!(guess.both(), None);
        assert_eq!(infer_columns(&Table::default()), ColumnGuess::default());
    }
}
