//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use carebot_consult::{DynSpeechRecognizer, SessionRegistry, TurnProcessor};
use carebot_core::config::CarebotConfig;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CarebotConfig>,
    /// Turn pipeline; speaks replies when voice is enabled.
    pub processor: TurnProcessor,
    /// Present only in voice mode.
    pub recognizer: Option<Arc<dyn DynSpeechRecognizer>>,
    pub registry: Arc<SessionRegistry>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// State for a text-only deployment. Sessions expire after
    /// `server.session_idle_minutes` without activity.
    pub fn new(config: CarebotConfig, processor: TurnProcessor) -> Self {
        let registry = SessionRegistry::with_idle_timeout(config.server.session_idle_timeout());
        Self {
            config: Arc::new(config),
            processor,
            recognizer: None,
            registry: Arc::new(registry),
            start_time: Instant::now(),
        }
    }

    /// Attach a speech recognizer, enabling the voice endpoint.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn DynSpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn voice_enabled(&self) -> bool {
        self.processor.voice_enabled()
    }
}
