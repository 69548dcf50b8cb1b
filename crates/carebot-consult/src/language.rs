//! Script-based language pick for spoken replies.

use std::ops::RangeInclusive;

use carebot_core::types::Language;

const DEVANAGARI: RangeInclusive<char> = '\u{0900}'..='\u{097F}';
const GURMUKHI: RangeInclusive<char> = '\u{0A00}'..='\u{0A7F}';

/// Pick the speech language for `text` from the scripts it contains.
///
/// Any Devanagari character gives Hindi, otherwise any Gurmukhi character
/// gives Punjabi, otherwise English. Devanagari is checked first, so mixed
/// text resolves to Hindi.
pub fn classify_language(text: &str) -> Language {
    if text.chars().any(|c| DEVANAGARI.contains(&c)) {
        Language::Hindi
    } else if text.chars().any(|c| GURMUKHI.contains(&c)) {
        Language::Punjabi
    } else {
        Language::English
    }
}
