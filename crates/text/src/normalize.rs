//! Canonical key normalization.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize free text into a comparable key.
///
/// Lowercases, decomposes (NFD) and strips combining marks, folds every run
/// of non-alphanumeric characters into a single space, and trims. The result
/// contains only `a-z`, `0-9`, and single spaces.
///
/// The function is idempotent: `normalize(normalize(x)) == normalize(x)`.
///
/// # Example
/// ```
/// use pracehub_text::normalize;
///
/// assert_eq!(normalize("Číšník / servírka"), "cisnik servirka");
/// assert_eq!(normalize("  Plzeň-jih  "), "plzen jih");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_gap = false;

    for c in text.to_lowercase().nfd() {
        if is_combining_mark(c) {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            if pending_gap && !out.is_empty() {
                out.push(' ');
            }
            pending_gap = false;
            out.push(c);
        } else {
            // Letters outside a-z0-9 that survive decomposition fold into
            // the same gap as punctuation and whitespace.
            pending_gap = true;
        }
    }

    out
}

/// Split a normalized key into tokens, dropping empties.
pub fn tokenize(key: &str) -> impl Iterator<Item = &str> {
    key.split_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_diacritics_stripped() {
        assert_eq!(normalize("Číšník"), "cisnik");
        assert_eq!(normalize("Řidič nákladního vozidla"), "ridic nakladniho vozidla");
    }

    #[test]
    fn test_case_and_diacritic_insensitive() {
        assert_eq!(normalize("Číšník"), normalize("cisnik"));
        assert_eq!(normalize("PLZEŇ"), normalize("plzen"));
    }

    #[test]
    fn test_punctuation_folds_to_single_space() {
        assert_eq!(normalize("kuchař -- číšník"), "kuchar cisnik");
        assert_eq!(normalize("a,b;c"), "a b c");
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(normalize("  !ústí nad labem?  "), "usti nad labem");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_digits_kept() {
        assert_eq!(normalize("CZ032"), "cz032");
    }

    #[test]
    fn test_tokenize_drops_empties() {
        let toks: Vec<&str> = tokenize("auto  mechanik").collect();
        assert_eq!(toks, vec!["auto", "mechanik"]);
        assert_eq!(tokenize("").count(), 0);
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(s in "\\PC{0,64}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalize_is_ascii_key(s in "\\PC{0,64}") {
            let key = normalize(&s);
            prop_assert!(key.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '));
            prop_assert!(!key.starts_with(' '));
            prop_assert!(!key.ends_with(' '));
            prop_assert!(!key.contains("  "));
        }
    }
}
