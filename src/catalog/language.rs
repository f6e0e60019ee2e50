//! Language restriction terms.
//!
//! The provider's `langRestrict` parameter is not reliable on its own, so
//! search text also carries a language term. Codes outside the table fall
//! back to [`FALLBACK_LANGUAGE_TERM`]; that is policy, not an error.

/// Term used for language codes not in [`LANGUAGE_TERMS`].
pub const FALLBACK_LANGUAGE_TERM: &str = "language:en";

/// ISO 639-1 code → search term.
pub const LANGUAGE_TERMS: &[(&str, &str)] = &[
    ("en", "language:en"),
    ("es", "language:es"),
    ("fr", "language:fr"),
    ("de", "language:de"),
    ("it", "language:it"),
    ("pt", "language:pt"),
    ("nl", "language:nl"),
    ("sv", "language:sv"),
    ("pl", "language:pl"),
    ("ru", "language:ru"),
    ("ja", "language:ja"),
    ("zh", "language:zh"),
    ("ko", "language:ko"),
    ("ar", "language:ar"),
];

/// Search term for a language code.
pub fn language_term(code: &str) -> &'static str {
    LANGUAGE_TERMS
        .iter()
        .find(|(lang, _)| *lang == code)
        .map(|(_, term)| *term)
        .unwrap_or(FALLBACK_LANGUAGE_TERM)
}
