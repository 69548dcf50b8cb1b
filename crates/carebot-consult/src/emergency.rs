//! Keyword screen for symptoms that need urgent care.

/// Phrases that short-circuit a turn straight to the emergency notice.
pub const EMERGENCY_KEYWORDS: [&str; 5] = [
    "chest pain",
    "difficulty breathing",
    "shortness of breath",
    "severe pain",
    "unconscious",
];

/// Returns true if any emergency phrase occurs anywhere in `text`,
/// ignoring case.
///
/// Plain substring containment: no tokenization and no word boundaries, so
/// "unconsciousness" matches "unconscious".
pub fn detect_emergency(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let lowered = text.to_lowercase();
    EMERGENCY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_keyword_inside_sentence() {
        assert!(detect_emergency("I have severe chest pain"));
    }

    #[test]
    fn test_ignores_non_emergency() {
        assert!(!detect_emergency("I have a headache"));
        assert!(!detect_emergency("my chest hurts a bit"));
    }

    #[test]
    fn test_empty_input() {
        assert!(!detect_emergency(""));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(detect_emergency("DIFFICULTY BREATHING since morning"));
        assert!(detect_emergency("Shortness Of Breath"));
    }

    #[test]
    fn test_every_keyword_matches() {
        for keyword in EMERGENCY_KEYWORDS {
            assert!(detect_emergency(keyword), "{keyword} should match");
            assert!(detect_emergency(&format!("prefix {keyword} suffix")));
        }
    }

    #[test]
    fn test_substring_without_word_boundary() {
        assert!(detect_emergency("he suffered unconsciousness"));
        assert!(detect_emergency("severe painful cramps"));
    }

    #[test]
    fn test_partial_phrase_does_not_match() {
        assert!(!detect_emergency("chest"));
        assert!(!detect_emergency("pain in my chest"));
        assert!(!detect_emergency("breathing is fine"));
    }

    #[test]
    fn test_non_latin_text() {
        assert!(!detect_emergency("मुझे सिरदर्द है"));
        assert!(detect_emergency("मुझे chest pain है"));
    }
}
