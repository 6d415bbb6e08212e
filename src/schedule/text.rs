//! Text folding shared by closed-marker detection, day-key parsing and the
//! listing search filter.

use unicode_normalization::UnicodeNormalization;

/// Lower-cases `s` and strips combining diacritics, so `"Fermé"` and
/// `"FERME"` both fold to `"ferme"`.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}
