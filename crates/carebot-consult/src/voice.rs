//! Speech seams for the voice-enabled consultation.
//!
//! Synthesis turns reply text into a playable clip; recognition turns a
//! recorded sample into one utterance. Both are traits so the processor and
//! the HTTP layer can run against the mocks below.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tracing::debug;

use carebot_core::types::{AudioClip, Language};

use crate::error::ConsultError;

// =============================================================================
// Traits
// =============================================================================

/// Text-to-speech backend.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(
        &self,
        text: &str,
        language: Language,
    ) -> impl Future<Output = Result<AudioClip, ConsultError>> + Send;
}

/// Speech-to-text backend with a fixed recognition language.
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe one recorded utterance. An empty transcript is an error.
    fn transcribe(
        &self,
        audio: &[u8],
        mime_type: &str,
    ) -> impl Future<Output = Result<String, ConsultError>> + Send;
}

/// Object-safe version of [`SpeechSynthesizer`].
pub trait DynSpeechSynthesizer: Send + Sync {
    fn synthesize_boxed<'a>(
        &'a self,
        text: &'a str,
        language: Language,
    ) -> Pin<Box<dyn Future<Output = Result<AudioClip, ConsultError>> + Send + 'a>>;
}

impl<T: SpeechSynthesizer> DynSpeechSynthesizer for T {
    fn synthesize_boxed<'a>(
        &'a self,
        text: &'a str,
        language: Language,
    ) -> Pin<Box<dyn Future<Output = Result<AudioClip, ConsultError>> + Send + 'a>> {
        Box::pin(self.synthesize(text, language))
    }
}

/// Object-safe version of [`SpeechRecognizer`].
pub trait DynSpeechRecognizer: Send + Sync {
    fn transcribe_boxed<'a>(
        &'a self,
        audio: &'a [u8],
        mime_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ConsultError>> + Send + 'a>>;
}

impl<T: SpeechRecognizer> DynSpeechRecognizer for T {
    fn transcribe_boxed<'a>(
        &'a self,
        audio: &'a [u8],
        mime_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ConsultError>> + Send + 'a>> {
        Box::pin(self.transcribe(audio, mime_type))
    }
}

// =============================================================================
// OutputDispatcher
// =============================================================================

/// Speaks replies through the configured synthesizer.
#[derive(Clone)]
pub struct OutputDispatcher {
    synthesizer: Arc<dyn DynSpeechSynthesizer>,
}

impl OutputDispatcher {
    pub fn new(synthesizer: Arc<dyn DynSpeechSynthesizer>) -> Self {
        Self { synthesizer }
    }

    /// Synthesize `text` in `language`. Failures propagate unchanged.
    pub async fn speak(&self, text: &str, language: Language) -> Result<AudioClip, ConsultError> {
        let clip = self.synthesizer.synthesize_boxed(text, language).await?;
        debug!(
            language = %language,
            text_len = text.len(),
            audio_bytes = clip.data.len(),
            "Reply synthesized"
        );
        Ok(clip)
    }
}

// =============================================================================
// Mocks
// =============================================================================

/// Synthesizer that echoes the text as bytes and records each request.
#[derive(Debug, Default)]
pub struct MockSpeechSynthesizer {
    requests: Mutex<Vec<(String, Language)>>,
    fail: bool,
}

impl MockSpeechSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A synthesizer whose every call fails.
    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// `(text, language)` pairs received so far, oldest first.
    pub fn requests(&self) -> Vec<(String, Language)> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn synthesize(&self, text: &str, language: Language) -> Result<AudioClip, ConsultError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((text.to_string(), language));
        if self.fail {
            return Err(ConsultError::Synthesis("mock synthesizer failure".into()));
        }
        Ok(AudioClip::mp3(text.as_bytes().to_vec(), language))
    }
}

/// Recognizer that returns a fixed transcript, or fails when it has none.
#[derive(Debug, Clone, Default)]
pub struct MockSpeechRecognizer {
    transcript: Option<String>,
}

impl MockSpeechRecognizer {
    pub fn with_transcript(transcript: &str) -> Self {
        Self {
            transcript: Some(transcript.to_string()),
        }
    }

    /// A recognizer that never understands anything.
    pub fn unintelligible() -> Self {
        Self { transcript: None }
    }
}

impl SpeechRecognizer for MockSpeechRecognizer {
    async fn transcribe(&self, audio: &[u8], _mime_type: &str) -> Result<String, ConsultError> {
        if audio.is_empty() {
            return Err(ConsultError::Recognition("no audio captured".into()));
        }
        match &self.transcript {
            Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            _ => Err(ConsultError::Recognition("could not understand audio".into())),
        }
    }
}
