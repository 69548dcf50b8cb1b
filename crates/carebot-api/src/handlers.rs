//! Route handler functions for all endpoints.
//!
//! Each handler resolves the session from the registry, holds its lock for
//! the whole turn, and returns JSON. Audio travels as base64-encoded MP3.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use carebot_consult::{ConsultationSession, TurnOutcome};
use carebot_core::types::{AudioClip, Turn};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_AUDIO_TYPE: &str = "audio/webm";

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// Synthesized speech, ready for a `data:` URI.
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioPayload {
    pub mime_type: String,
    pub language: String,
    /// Base64-encoded audio bytes.
    pub data: String,
}

impl From<AudioClip> for AudioPayload {
    fn from(clip: AudioClip) -> Self {
        Self {
            mime_type: clip.mime_type,
            language: clip.language.code().to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(&clip.data),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub transcript: Vec<Turn>,
    pub consultation_complete: bool,
    pub voice_enabled: bool,
    /// Spoken greeting; only set when the session is created in voice mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioPayload>,
}

impl SessionResponse {
    fn from_session(session: &ConsultationSession, voice_enabled: bool) -> Self {
        Self {
            id: session.id,
            started_at: session.started_at,
            transcript: session.turns().to_vec(),
            consultation_complete: session.is_complete(),
            voice_enabled,
            audio: None,
        }
    }
}

/// Result of one input. `turn` is absent when nothing was processed.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TurnResponse {
    pub turn: Option<Turn>,
    /// Language the reply was spoken in.
    pub language: Option<String>,
    pub emergency: bool,
    pub consultation_complete: bool,
    pub audio: Option<AudioPayload>,
    /// User-facing notice, e.g. when speech was not understood.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// What the recognizer heard, for voice input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl From<TurnOutcome> for TurnResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            turn: Some(outcome.turn),
            language: Some(outcome.language.code().to_string()),
            emergency: outcome.emergency,
            consultation_complete: outcome.consultation_complete,
            audio: outcome.audio.map(AudioPayload::from),
            notice: None,
            transcript: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub voice_enabled: bool,
    pub sessions: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - the consultation page.
pub async fn index() -> impl IntoResponse {
    Html(carebot_ui::CONSULT_HTML)
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        voice_enabled: state.voice_enabled(),
        sessions: state.registry.len(),
    })
}

/// POST /sessions - open a session seeded with the greeting.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let (id, shared) = state.registry.create()?;
    let mut session = shared.lock().await;

    let opened = match state.processor.open(&mut session).await {
        Ok(opened) => opened,
        Err(e) => {
            drop(session);
            let _ = state.registry.remove(id);
            return Err(e.into());
        }
    };

    let mut body = SessionResponse::from_session(&session, state.voice_enabled());
    body.audio = opened.and_then(|o| o.audio).map(AudioPayload::from);
    Ok((StatusCode::CREATED, Json(body)))
}

/// GET /sessions/{id} - transcript and completion flag.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let shared = state.registry.get(id)?;
    let session = shared.lock().await;
    Ok(Json(SessionResponse::from_session(
        &session,
        state.voice_enabled(),
    )))
}

/// DELETE /sessions/{id}
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.registry.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /sessions/{id}/messages - process one typed input.
///
/// Empty text is not an error: the session is left unchanged and no turn is
/// returned.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let shared = state.registry.get(id)?;
    let mut session = shared.lock().await;

    if request.text.is_empty() {
        return Ok(Json(TurnResponse {
            consultation_complete: session.is_complete(),
            ..TurnResponse::default()
        }));
    }

    let outcome = state.processor.respond(&mut session, &request.text).await?;
    Ok(Json(TurnResponse::from(outcome)))
}

/// POST /sessions/{id}/voice - recognize a recording, then process it.
///
/// Recognition failures come back as a `notice` with no turn processed.
pub async fn send_voice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TurnResponse>, ApiError> {
    let recognizer = state
        .recognizer
        .clone()
        .ok_or_else(|| ApiError::ServiceUnavailable("voice input is disabled".to_string()))?;
    let shared = state.registry.get(id)?;

    if body.len() > state.config.voice.max_upload_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "recording exceeds {} bytes",
            state.config.voice.max_upload_bytes
        )));
    }

    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.starts_with("audio/"))
        .unwrap_or(DEFAULT_AUDIO_TYPE);

    let mut session = shared.lock().await;

    let text = match recognizer.transcribe_boxed(&body, mime_type).await {
        Ok(text) => text,
        Err(e) => {
            tracing::info!(session_id = %id, error = %e, "Speech not recognized");
            return Ok(Json(TurnResponse {
                consultation_complete: session.is_complete(),
                notice: Some(format!("Could not recognize speech: {}", e)),
                ..TurnResponse::default()
            }));
        }
    };

    let outcome = state.processor.respond(&mut session, &text).await?;
    let mut response = TurnResponse::from(outcome);
    response.transcript = Some(text);
    Ok(Json(response))
}
