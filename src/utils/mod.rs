///! Some utility functions

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

pub mod comparison;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Removes byte-order marks, surrounding whitespace and diacritics.
///
/// Case is preserved, see [`fold`] for a case-insensitive form
pub fn normalize<S: AsRef<str>>(text: S) -> String {
    text.as_ref()
        .replace('\u{FEFF}', "")
        .trim()
        .nfd()
        .filter(|c| is_combining_mark(*c) == false)
        .collect()
}

/// [`normalize`], then lowercase. This is what header labels are compared with
pub fn fold<S: AsRef<str>>(text: S) -> String {
    normalize(text).to_lowercase()
}

/// Turns a display label (e.g. `"Cumpleaños del mes"`) into a slug (`"cumpleanos-del-mes"`)
pub fn slug_of<S: AsRef<str>>(label: S) -> String {
    let folded = fold(label);
    NON_SLUG_CHARS.replace_all(&folded, "-")
        .trim_matches('-')
        .to_string()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_bom_spaces_and_accents() {
        assert_eq!(normalize("\u{FEFF}  Cumpleaños  "), "Cumpleanos");
        assert_eq!(normalize("Académico"), "Academico");
        assert_eq!(normalize(""), "");
        assert_eq!(fold(" Día "), "dia");
    }

    #[test]
    fn slugs() {
        assert_eq!(slug_of("Cumpleaños"), "cumpleanos");
        assert_eq!(slug_of("  Académico / Eventos! "), "academico-eventos");
        assert_eq!(slug_of("--"), "");
    }
}
