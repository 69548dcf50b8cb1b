//! Turn processor: one user input in, one recorded turn out.
//!
//! The same processor serves text-only and voice-enabled deployments; voice
//! is a capability switched on by supplying an [`OutputDispatcher`].

use std::sync::Arc;

use tracing::{info, warn};

use carebot_core::types::{AudioClip, Language, Turn};

use crate::conversation::ConsultationSession;
use crate::emergency::detect_emergency;
use crate::error::ConsultError;
use crate::language::classify_language;
use crate::model::DynModelClient;
use crate::prompt::{is_final_summary, EMERGENCY_MESSAGE, OPENING_GREETING};
use crate::voice::OutputDispatcher;

/// Everything the presentation layer needs after one processed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub turn: Turn,
    /// Language the reply is spoken in.
    pub language: Language,
    /// Spoken reply, present only when voice is enabled.
    pub audio: Option<AudioClip>,
    pub emergency: bool,
    pub consultation_complete: bool,
}

/// Runs the emergency screen, the model call, and completion detection for
/// a session, then optionally speaks the reply.
#[derive(Clone)]
pub struct TurnProcessor {
    model: Arc<dyn DynModelClient>,
    dispatcher: Option<OutputDispatcher>,
}

impl TurnProcessor {
    /// A processor that only produces text.
    pub fn text_only(model: Arc<dyn DynModelClient>) -> Self {
        Self {
            model,
            dispatcher: None,
        }
    }

    /// A processor that also speaks every reply.
    pub fn with_voice(model: Arc<dyn DynModelClient>, dispatcher: OutputDispatcher) -> Self {
        Self {
            model,
            dispatcher: Some(dispatcher),
        }
    }

    pub fn voice_enabled(&self) -> bool {
        self.dispatcher.is_some()
    }

    /// Process one non-empty user input against `session`.
    ///
    /// Emergency input is answered with the fixed notice and never reaches
    /// the model. Otherwise the model receives the full history. The turn is
    /// appended only after a reply exists, so a failed model call leaves the
    /// session untouched.
    pub async fn process_turn(
        &self,
        session: &mut ConsultationSession,
        user_input: &str,
    ) -> Result<Turn, ConsultError> {
        self.run_turn(session, user_input)
            .await
            .map(|(turn, _emergency)| turn)
    }

    async fn run_turn(
        &self,
        session: &mut ConsultationSession,
        user_input: &str,
    ) -> Result<(Turn, bool), ConsultError> {
        if user_input.is_empty() {
            return Err(ConsultError::EmptyMessage);
        }

        let emergency = detect_emergency(user_input);
        let bot_text = if emergency {
            warn!(session_id = %session.id, "Emergency keywords detected; skipping model call");
            session.mark_complete();
            EMERGENCY_MESSAGE.to_string()
        } else {
            let reply = self
                .model
                .get_reply_boxed(session.turns(), user_input)
                .await?;
            if is_final_summary(&reply) {
                info!(session_id = %session.id, "Consultation summary delivered");
                session.mark_complete();
            }
            reply
        };

        let turn = Turn::new(user_input, bot_text);
        session.record(turn.clone());
        Ok((turn, emergency))
    }

    /// Process a turn and, when voice is enabled, speak the reply in the
    /// language of the user's input.
    ///
    /// A synthesis failure is returned after the turn has been recorded.
    pub async fn respond(
        &self,
        session: &mut ConsultationSession,
        user_input: &str,
    ) -> Result<TurnOutcome, ConsultError> {
        let (turn, emergency) = self.run_turn(session, user_input).await?;
        let language = classify_language(user_input);
        let audio = self.speak(&turn.bot_text, language).await?;

        info!(
            session_id = %session.id,
            turns = session.store().len(),
            emergency,
            complete = session.is_complete(),
            "Turn processed"
        );

        Ok(TurnOutcome {
            turn,
            language,
            audio,
            emergency,
            consultation_complete: session.is_complete(),
        })
    }

    /// Seed the opening greeting if the session is still empty, speaking it
    /// in English when voice is enabled. Returns `None` when the session
    /// already had history.
    pub async fn open(
        &self,
        session: &mut ConsultationSession,
    ) -> Result<Option<TurnOutcome>, ConsultError> {
        if !session.seed_if_empty(OPENING_GREETING) {
            return Ok(None);
        }
        let turn = Turn::opening(OPENING_GREETING);
        let language = Language::English;
        let audio = self.speak(&turn.bot_text, language).await?;

        Ok(Some(TurnOutcome {
            turn,
            language,
            audio,
            emergency: false,
            consultation_complete: session.is_complete(),
        }))
    }

    async fn speak(&self, text: &str, language: Language) -> Result<Option<AudioClip>, ConsultError> {
        match &self.dispatcher {
            Some(dispatcher) => dispatcher.speak(text, language).await.map(Some),
            None => Ok(None),
        }
    }
}
