use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CarebotError, Result};

/// Top-level configuration for the Carebot application.
///
/// Loaded from `~/.carebot/config.toml` by default. Every section falls back
/// to its defaults when absent, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarebotConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl CarebotConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CarebotConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the model or server cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.model.model.trim().is_empty() {
            return Err(CarebotError::Config("model.model must not be empty".into()));
        }
        if self.model.base_url.trim().is_empty() {
            return Err(CarebotError::Config(
                "model.base_url must not be empty".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(CarebotError::Config(format!(
                "model.temperature must be between 0.0 and 2.0, got {}",
                self.model.temperature
            )));
        }
        if self.model.max_tokens == 0 {
            return Err(CarebotError::Config(
                "model.max_tokens must be greater than 0".into(),
            ));
        }
        if self.model.api_key_env.trim().is_empty() {
            return Err(CarebotError::Config(
                "model.api_key_env must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Read the model API key from the environment variable named in
    /// `model.api_key_env`. A missing or blank key is fatal at startup.
    pub fn resolve_api_key(&self) -> Result<String> {
        let var = &self.model.api_key_env;
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(CarebotError::MissingApiKey { var: var.clone() }),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Minutes without activity before a session is dropped. 0 keeps
    /// sessions until they are deleted.
    pub session_idle_minutes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            session_idle_minutes: 30,
        }
    }
}

impl ServerConfig {
    pub fn session_idle_timeout(&self) -> Option<Duration> {
        match self.session_idle_minutes {
            0 => None,
            minutes => Some(Duration::from_secs(minutes.saturating_mul(60))),
        }
    }
}

/// Chat-completion model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible API, without a trailing path.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum output tokens per reply.
    pub max_tokens: u32,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 600,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Voice input and output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Whether replies are spoken and the record control is offered.
    pub enabled: bool,
    /// Base URL of the translate TTS service.
    pub tts_base_url: String,
    /// Base URL of the transcription API. Empty means `model.base_url`.
    pub stt_base_url: String,
    /// Transcription model identifier.
    pub stt_model: String,
    /// Fixed recognition language for recorded input.
    pub recognition_language: String,
    /// Largest accepted audio upload in bytes.
    pub max_upload_bytes: usize,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tts_base_url: "https://translate.google.com".to_string(),
            stt_base_url: String::new(),
            stt_model: "whisper-1".to_string(),
            recognition_language: "hi".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl VoiceConfig {
    /// Transcription base URL, falling back to the model API's.
    pub fn effective_stt_base_url<'a>(&'a self, model: &'a ModelConfig) -> &'a str {
        if self.stt_base_url.trim().is_empty() {
            &model.base_url
        } else {
            &self.stt_base_url
        }
    }
}
