//! Consultation engine for Carebot.
//!
//! Holds per-session conversation state, screens input for emergencies,
//! replays the transcript to a chat-completion model, and optionally speaks
//! the reply back in the language the user wrote in.

pub mod conversation;
pub mod emergency;
pub mod error;
pub mod language;
pub mod model;
pub mod openai;
pub mod processor;
pub mod prompt;
pub mod registry;
pub mod stt;
pub mod tts;
pub mod voice;

pub use conversation::{ConsultationSession, ConversationStore};
pub use emergency::{detect_emergency, EMERGENCY_KEYWORDS};
pub use error::ConsultError;
pub use language::classify_language;
pub use model::{build_messages, DynModelClient, MockModelClient, ModelClient};
pub use openai::OpenAiChatClient;
pub use processor::{TurnOutcome, TurnProcessor};
pub use registry::{SessionRegistry, SharedSession};
pub use stt::OpenAiTranscriber;
pub use tts::TranslateTts;
pub use voice::{
    DynSpeechRecognizer, DynSpeechSynthesizer, MockSpeechRecognizer, MockSpeechSynthesizer,
    OutputDispatcher, SpeechRecognizer, SpeechSynthesizer,
};
