//! Speech synthesis through the Google Translate TTS endpoint.
//!
//! The endpoint only accepts short inputs, so the reply is split on
//! whitespace into chunks of at most [`MAX_CHUNK_CHARS`] characters. Each
//! chunk is fetched in order and the MP3 frames are concatenated into one
//! clip, which players handle as a single stream.

use std::time::Duration;

use tracing::{debug, warn};

use carebot_core::types::{AudioClip, Language};

use crate::error::ConsultError;
use crate::voice::SpeechSynthesizer;

/// Largest piece of text sent in one request.
pub const MAX_CHUNK_CHARS: usize = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Split `text` into whitespace-delimited chunks of at most `max_chars`
/// characters. Words longer than `max_chars` are cut on character
/// boundaries.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Synthesizer backed by `GET {base_url}/translate_tts`.
#[derive(Debug, Clone)]
pub struct TranslateTts {
    http: reqwest::Client,
    endpoint: String,
}

impl TranslateTts {
    pub fn new(base_url: &str) -> Result<Self, ConsultError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConsultError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint: format!("{}/translate_tts", base_url.trim_end_matches('/')),
        })
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: Language,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, ConsultError> {
        let params: [(&str, String); 7] = [
            ("ie", "UTF-8".to_string()),
            ("client", "tw-ob".to_string()),
            ("tl", language.code().to_string()),
            ("q", chunk.to_string()),
            ("idx", idx.to_string()),
            ("total", total.to_string()),
            ("textlen", chunk.chars().count().to_string()),
        ];

        let response = self
            .http
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| ConsultError::Synthesis(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, chunk = idx, "TTS request rejected");
            return Err(ConsultError::Synthesis(format!(
                "TTS service returned {} for chunk {} of {}",
                status,
                idx + 1,
                total
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConsultError::Synthesis(format!("failed to read audio: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

impl SpeechSynthesizer for TranslateTts {
    async fn synthesize(&self, text: &str, language: Language) -> Result<AudioClip, ConsultError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(ConsultError::Synthesis("no text to speak".into()));
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let part = self.fetch_chunk(chunk, language, idx, total).await?;
            audio.extend_from_slice(&part);
        }

        if audio.is_empty() {
            return Err(ConsultError::Synthesis("TTS service returned no audio".into()));
        }

        debug!(language = %language, chunks = total, bytes = audio.len(), "TTS complete");
        Ok(AudioClip::mp3(audio, language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_chunk_short_text_is_single_chunk() {
        assert_eq!(chunk_text("Hello there", 100), vec!["Hello there"]);
    }

    #[test]
    fn test_chunk_empty_text() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("   \n\t ", 100).is_empty());
    }

    #[test]
    fn test_chunk_respects_limit_on_word_boundaries() {
        let chunks = chunk_text("aaa bbb ccc ddd", 7);
        assert_eq!(chunks, vec!["aaa bbb", "ccc ddd"]);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 7);
        }
    }

    #[test]
    fn test_chunk_splits_long_word() {
        let chunks = chunk_text("hi abcdefghij yo", 4);
        assert_eq!(chunks, vec!["hi", "abcd", "efgh", "ij", "yo"]);
    }

    #[test]
    fn test_chunk_counts_characters_not_bytes() {
        // Six code points but eighteen bytes.
        let word = "नमस्ते";
        let chunks = chunk_text(word, 6);
        assert_eq!(chunks, vec![word.to_string()]);
    }

    #[test]
    fn test_chunk_collapses_whitespace() {
        assert_eq!(chunk_text("a\n\nb   c", 100), vec!["a b c"]);
    }

    #[tokio::test]
    async fn test_synthesize_concatenates_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("tl", "hi"))
            .and(query_param("client", "tw-ob"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xFB]))
            .expect(2)
            .mount(&server)
            .await;

        let tts = TranslateTts::new(&server.uri()).unwrap();
        let text = format!("{} {}", "a".repeat(60), "b".repeat(60));
        let clip = tts.synthesize(&text, Language::Hindi).await.unwrap();
        assert_eq!(clip.data, vec![0xFF, 0xFB, 0xFF, 0xFB]);
        assert_eq!(clip.language, Language::Hindi);
        assert_eq!(clip.mime_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_synthesize_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let tts = TranslateTts::new(&server.uri()).unwrap();
        let err = tts.synthesize("hello", Language::English).await.unwrap_err();
        assert!(matches!(err, ConsultError::Synthesis(ref m) if m.contains("503")));
    }

    #[tokio::test]
    async fn test_synthesize_empty_text_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tts = TranslateTts::new(&server.uri()).unwrap();
        assert!(tts.synthesize("  ", Language::English).await.is_err());
    }
}
