//! The consultation page served at `/`.
//!
//! On load the page opens a session (`POST /sessions`) and renders the
//! greeting. Typed messages go to `/sessions/{id}/messages`; recordings made
//! with `MediaRecorder` go to `/sessions/{id}/voice`. Spoken replies arrive
//! as base64 MP3 and are played through an `<audio>` element.
//! Leaving the page deletes the session with a keepalive request.

/// The complete self-contained consultation page.
pub const CONSULT_HTML: &str = include_str!("../assets/consult.html");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_is_valid_html() {
        assert!(CONSULT_HTML.starts_with("<!DOCTYPE html>"));
        assert!(CONSULT_HTML.contains("<html"));
        assert!(CONSULT_HTML.contains("</html>"));
    }

    #[test]
    fn page_has_title_and_safety_notice() {
        assert!(CONSULT_HTML.contains("Healthcare Chatbot"));
        assert!(CONSULT_HTML.contains("Safety Notice: This bot provides only general advice"));
    }

    #[test]
    fn page_references_session_endpoints() {
        assert!(CONSULT_HTML.contains("/sessions"));
        assert!(CONSULT_HTML.contains("/messages"));
        assert!(CONSULT_HTML.contains("/voice"));
    }

    #[test]
    fn page_supports_voice_and_audio_playback() {
        assert!(CONSULT_HTML.contains("MediaRecorder"));
        assert!(CONSULT_HTML.contains("data:audio/mpeg;base64,"));
    }

    #[test]
    fn page_ends_session_when_closed() {
        assert!(CONSULT_HTML.contains("'pagehide'"));
        assert!(CONSULT_HTML.contains("method: 'DELETE', keepalive: true"));
    }

    #[test]
    fn page_echoes_recognized_speech() {
        assert!(CONSULT_HTML.contains("'You said: ' + result.transcript"));
    }

    #[test]
    fn page_has_no_external_urls() {
        assert!(!CONSULT_HTML.contains("https://cdn"));
        assert!(!CONSULT_HTML.contains("https://unpkg"));
        assert!(!CONSULT_HTML.contains("https://fonts.googleapis"));
    }
}
