//! Error types for the consultation engine.

use carebot_core::error::CarebotError;

/// Errors from the consultation engine.
#[derive(Debug, thiserror::Error)]
pub enum ConsultError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("model error: {0}")]
    Model(String),
    #[error("speech synthesis error: {0}")]
    Synthesis(String),
    #[error("speech recognition error: {0}")]
    Recognition(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("state error: {0}")]
    State(String),
}

impl From<CarebotError> for ConsultError {
    fn from(err: CarebotError) -> Self {
        match err {
            CarebotError::Config(msg) => ConsultError::Config(msg),
            other => ConsultError::Config(other.to_string()),
        }
    }
}
