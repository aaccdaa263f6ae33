//! A module to parse tab-separated exports

use crate::tabular::Table;

/// Parse tab-separated text into a [`Table`].
///
/// Carriage returns are dropped, rows are split on `\n` and cells on `\t`.
/// Fully blank rows are discarded. The first remaining row is the header.
pub fn parse_tsv(text: &str) -> Table {
    let clean = text.replace('\r', "");
    let raw_rows = clean.split('\n')
        .map(|line| line.split('\t').map(String::from).collect())
        .collect();

    Table::from_raw_rows(raw_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows() {
        let table = parse_tsv("\u{FEFF}Fecha \tActividad\r\n2025-03-10\tEnsayo\r\n\t  \r\n\n11/03/2025\tConcierto\n");
        assert_eq!(table.header(), &["Fecha".to_string(), "Actividad".to_string()]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.cell(1, 1), "Concierto");
        assert_eq!(table.cell(1, 7), "");
        assert_eq!(table.cell(9, 0), "");
    }

    #[test]
    fn leading_blank_rows_are_skipped() {
        let table = parse_tsv("\n\t\t\nNombre\tDía\nAna\t3/4/2025");
        assert_eq!(table.header()[1], "Día");
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn empty_payload() {
        assert!(parse_tsv("").is_empty());
        assert!(parse_tsv(" \n\t\r\n").is_empty());
        assert_eq!(parse_tsv("").rows().len(), 0);
    }
}
