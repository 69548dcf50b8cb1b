//! Speech recognition through an OpenAI-compatible transcription API.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConsultError;
use crate::voice::SpeechRecognizer;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// Recognizer backed by `POST {base_url}/audio/transcriptions`.
///
/// The recognition language is fixed at construction; the service is not
/// asked to detect it.
pub struct OpenAiTranscriber {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    language: String,
}

impl std::fmt::Debug for OpenAiTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTranscriber")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("language", &self.language)
            .finish()
    }
}

impl OpenAiTranscriber {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: &str,
        language: &str,
    ) -> Result<Self, ConsultError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConsultError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint: format!("{}/audio/transcriptions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.to_string(),
            language: language.to_string(),
        })
    }
}

/// File name the transcription API uses to sniff the container format.
fn file_name_for(mime_type: &str) -> &'static str {
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    match essence {
        "audio/wav" | "audio/x-wav" | "audio/wave" => "input.wav",
        "audio/mpeg" | "audio/mp3" => "input.mp3",
        "audio/ogg" => "input.ogg",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "input.m4a",
        _ => "input.webm",
    }
}

impl SpeechRecognizer for OpenAiTranscriber {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, ConsultError> {
        if audio.is_empty() {
            return Err(ConsultError::Recognition("no audio captured".into()));
        }

        let part = Part::bytes(audio.to_vec())
            .file_name(file_name_for(mime_type))
            .mime_str(mime_type)
            .map_err(|e| ConsultError::Recognition(format!("invalid audio type: {}", e)))?;
        let form = Form::new()
            .text("model", self.model.clone())
            .text("language", self.language.clone())
            .part("file", part);

        debug!(audio_bytes = audio.len(), language = %self.language, "Sending transcription request");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ConsultError::Recognition(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Transcription request rejected");
            return Err(ConsultError::Recognition(format!(
                "transcription service returned {}",
                status
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ConsultError::Recognition(format!("invalid response body: {}", e)))?;

        let text = parsed.text.trim();
        if text.is_empty() {
            return Err(ConsultError::Recognition("could not understand audio".into()));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_file_name_for_known_types() {
        assert_eq!(file_name_for("audio/wav"), "input.wav");
        assert_eq!(file_name_for("audio/webm;codecs=opus"), "input.webm");
        assert_eq!(file_name_for("audio/mpeg"), "input.mp3");
        assert_eq!(file_name_for("application/octet-stream"), "input.webm");
    }

    #[tokio::test]
    async fn test_transcribe_returns_trimmed_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "text": " मेरा नाम आशा है " })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let stt = OpenAiTranscriber::new(
            &format!("{}/v1", server.uri()),
            "sk-test",
            "whisper-1",
            "hi",
        )
        .unwrap();
        let text = stt.transcribe(b"RIFF....WAVE", "audio/wav").await.unwrap();
        assert_eq!(text, "मेरा नाम आशा है");
    }

    #[tokio::test]
    async fn test_blank_transcript_is_recognition_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "   " })))
            .mount(&server)
            .await;

        let stt = OpenAiTranscriber::new(&server.uri(), "k", "whisper-1", "hi").unwrap();
        let err = stt.transcribe(b"data", "audio/webm").await.unwrap_err();
        assert!(matches!(err, ConsultError::Recognition(_)));
    }

    #[tokio::test]
    async fn test_error_status_is_recognition_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let stt = OpenAiTranscriber::new(&server.uri(), "bad", "whisper-1", "hi").unwrap();
        let err = stt.transcribe(b"data", "audio/webm").await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_empty_audio_rejected_locally() {
        let stt = OpenAiTranscriber::new("http://127.0.0.1:9", "k", "whisper-1", "hi").unwrap();
        let err = stt.transcribe(&[], "audio/wav").await.unwrap_err();
        assert!(err.to_string().contains("no audio"));
    }
}
