//! Accent folding and Spanish-aware ordering for catalog labels.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold a label for equality lookups: NFD, combining marks stripped,
/// lowercased and trimmed. `"  Transmisión "` and `"transmision"` fold to the
/// same key.
#[must_use]
pub fn fold(value: &str) -> String {
    value
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Primary collation key. Like [`fold`], except `ñ` keeps its own position
/// after `n` instead of collapsing into it.
fn collation_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for ch in value.trim().chars() {
        match ch {
            'ñ' | 'Ñ' => {
                key.push('n');
                key.push(char::MAX);
            }
            _ => key.extend(
                std::iter::once(ch)
                    .nfd()
                    .filter(|c| !is_combining_mark(*c))
                    .flat_map(char::to_lowercase),
            ),
        }
    }
    key
}

/// Secondary key: case folded, accents kept, so `a` sorts before `á`.
fn accent_key(value: &str) -> String {
    value.trim().nfc().flat_map(char::to_lowercase).collect()
}

/// Tertiary key: one flag per character, lowercase before uppercase.
fn case_key(value: &str) -> Vec<bool> {
    value.trim().chars().map(char::is_uppercase).collect()
}

/// Compare two labels the way a Spanish-locale sort would: letters first
/// (accents and case ignored, `ñ` after `n`), then accents, then case with
/// lowercase first. Remaining ties fall back to the raw strings so the order
/// is total.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_accents_and_case() {
        assert_eq!(fold("  Transmisión "), "transmision");
        assert_eq!(fold("ELÉCTRICO"), "electrico");
        assert_eq!(fold("Carrocería"), fold("carroceria"));
    }

    #[test]
    fn test_collate_ignores_case_and_accents() {
        assert_eq!(collate("ápice", "Apriete"), Ordering::Less);
        assert_eq!(collate("bmw", "BMW"), Ordering::Less);
        assert_eq!(collate("Honda", "Yamaha"), Ordering::Less);
    }

    #[test]
    fn test_collate_breaks_case_ties_lowercase_first() {
        let mut labels = vec!["KTM", "Ktm", "ktm"];
        labels.sort_by(|a, b| collate(a, b));
        assert_eq!(labels, vec!["ktm", "Ktm", "KTM"]);
    }

    #[test]
    fn test_collate_breaks_accent_ties_before_case() {
        assert_eq!(collate("Peña", "pena"), Ordering::Greater);
        assert_eq!(collate("Cafe", "café"), Ordering::Less);
        assert_eq!(collate("café", "Café"), Ordering::Less);
    }

    #[test]
    fn test_collate_places_enye_after_n() {
        let mut labels = vec!["Ñandú", "Ocelot", "Nuevo", "Nz"];
        labels.sort_by(|a, b| collate(a, b));
        assert_eq!(labels, vec!["Nuevo", "Nz", "Ñandú", "Ocelot"]);
    }
}
