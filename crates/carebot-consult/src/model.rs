//! Chat-completion model seam.
//!
//! - [`ModelClient`] is the async trait the turn processor calls.
//! - [`DynModelClient`] is its object-safe twin for `Arc<dyn ...>` storage.
//! - [`MockModelClient`] returns scripted replies and records every
//!   transcript it was sent.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use carebot_core::types::{ChatMessage, Turn};

use crate::error::ConsultError;
use crate::prompt::SYSTEM_PROMPT;

/// Build the transcript for one model call.
///
/// The system prompt comes first, then every stored turn as a user message
/// followed by an assistant message, then the new user text. The result
/// always holds `2 * conversation.len() + 2` messages.
pub fn build_messages(
    system_prompt: &str,
    conversation: &[Turn],
    new_user_text: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(conversation.len() * 2 + 2);
    messages.push(ChatMessage::system(system_prompt));
    for turn in conversation {
        messages.push(ChatMessage::user(turn.user_text.as_str()));
        messages.push(ChatMessage::assistant(turn.bot_text.as_str()));
    }
    messages.push(ChatMessage::user(new_user_text));
    messages
}

/// A remote model that answers the next user message given the history.
pub trait ModelClient: Send + Sync {
    /// Send the full replayed transcript plus `new_user_text` and return the
    /// reply text with surrounding whitespace trimmed.
    fn get_reply(
        &self,
        conversation: &[Turn],
        new_user_text: &str,
    ) -> impl Future<Output = Result<String, ConsultError>> + Send;
}

/// Object-safe version of [`ModelClient`] for dynamic dispatch.
///
/// A blanket implementation covers every `ModelClient`.
pub trait DynModelClient: Send + Sync {
    fn get_reply_boxed<'a>(
        &'a self,
        conversation: &'a [Turn],
        new_user_text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ConsultError>> + Send + 'a>>;
}

impl<T: ModelClient> DynModelClient for T {
    fn get_reply_boxed<'a>(
        &'a self,
        conversation: &'a [Turn],
        new_user_text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ConsultError>> + Send + 'a>> {
        Box::pin(self.get_reply(conversation, new_user_text))
    }
}

// ---------------------------------------------------------------------------
// MockModelClient
// ---------------------------------------------------------------------------

/// Scripted model client for tests and offline development.
///
/// Replies are served from a queue; once it is empty the default reply is
/// used. Every call's transcript is recorded, built the same way the real
/// client builds it.
#[derive(Debug)]
pub struct MockModelClient {
    default_reply: String,
    queued: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self::with_reply("Thank you. Could you tell me more about how you are feeling?")
    }

    /// A client that answers every call with `reply`.
    pub fn with_reply(reply: &str) -> Self {
        Self {
            default_reply: reply.to_string(),
            queued: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply for the next unanswered call.
    pub fn push_reply(&self, reply: &str) {
        self.queued_lock().push_back(Ok(reply.to_string()));
    }

    /// Queue a failure for the next unanswered call.
    pub fn push_failure(&self, message: &str) {
        self.queued_lock().push_back(Err(message.to_string()));
    }

    pub fn call_count(&self) -> usize {
        self.calls_lock().len()
    }

    /// Transcripts received so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls_lock().clone()
    }

    fn queued_lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, String>>> {
        self.queued.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn calls_lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<ChatMessage>>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelClient for MockModelClient {
    async fn get_reply(
        &self,
        conversation: &[Turn],
        new_user_text: &str,
    ) -> Result<String, ConsultError> {
        let messages = build_messages(SYSTEM_PROMPT, conversation, new_user_text);
        self.calls_lock().push(messages);

        let next = self.queued_lock().pop_front();
        match next {
            Some(Ok(reply)) => Ok(reply.trim().to_string()),
            Some(Err(message)) => Err(ConsultError::Model(message)),
            None => Ok(self.default_reply.trim().to_string()),
        }
    }
}
