//! Per-session conversation state.
//!
//! A [`ConsultationSession`] bundles the append-only turn history with the
//! consultation-complete flag. The session layer owns it and hands it to the
//! turn processor by mutable reference.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use carebot_core::types::Turn;

// =============================================================================
// ConversationStore
// =============================================================================

/// Ordered, append-only history of turns.
///
/// Insertion order is also the order the turns are replayed to the model.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn to the end of the history.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in insertion order.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }
}

// =============================================================================
// ConsultationSession
// =============================================================================

/// State of one consultation: its history and whether it has concluded.
///
/// The completion flag is observable only. Once set it stays set, and it
/// does not stop further turns from being processed.
#[derive(Debug, Clone)]
pub struct ConsultationSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    store: ConversationStore,
    consultation_complete: bool,
}

impl ConsultationSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            store: ConversationStore::new(),
            consultation_complete: false,
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn turns(&self) -> &[Turn] {
        self.store.all()
    }

    pub fn is_complete(&self) -> bool {
        self.consultation_complete
    }

    /// Append the assistant-initiated opening turn if nothing has been said
    /// yet. Returns whether the turn was added.
    pub fn seed_if_empty(&mut self, greeting: &str) -> bool {
        if !self.store.is_empty() {
            return false;
        }
        self.store.append(Turn::opening(greeting));
        true
    }

    pub(crate) fn record(&mut self, turn: Turn) {
        self.store.append(turn);
    }

    pub(crate) fn mark_complete(&mut self) {
        self.consultation_complete = true;
    }
}

impl Default for ConsultationSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_appends_in_order() {
        let mut store = ConversationStore::new();
        assert!(store.is_empty());

        store.append(Turn::new("one", "first"));
        store.append(Turn::new("two", "second"));
        store.append(Turn::new("three", "third"));

        assert_eq!(store.len(), 3);
        let users: Vec<&str> = store.all().iter().map(|t| t.user_text.as_str()).collect();
        assert_eq!(users, vec!["one", "two", "three"]);
        assert_eq!(store.all()[2].bot_text, "third");
    }

    #[test]
    fn test_earlier_turns_unchanged_by_append() {
        let mut store = ConversationStore::new();
        store.append(Turn::new("hello", "hi"));
        let snapshot = store.all().to_vec();

        store.append(Turn::new("again", "yes"));
        assert_eq!(&store.all()[..1], snapshot.as_slice());
    }

    #[test]
    fn test_new_session_is_empty_and_open() {
        let session = ConsultationSession::new();
        assert!(session.store().is_empty());
        assert!(!session.is_complete());
    }

    #[test]
    fn test_seed_only_once() {
        let mut session = ConsultationSession::new();
        assert!(session.seed_if_empty("Hello!"));
        assert!(!session.seed_if_empty("Hello!"));
        assert_eq!(session.turns().len(), 1);
        assert!(session.turns()[0].is_opening());
        assert_eq!(session.turns()[0].bot_text, "Hello!");
    }

    #[test]
    fn test_seed_skipped_when_history_exists() {
        let mut session = ConsultationSession::new();
        session.record(Turn::new("hi", "hello"));
        assert!(!session.seed_if_empty("Hello!"));
        assert_eq!(session.turns().len(), 1);
    }

    #[test]
    fn test_completion_is_sticky() {
        let mut session = ConsultationSession::new();
        session.mark_complete();
        session.record(Turn::new("more", "ok"));
        assert!(session.is_complete());
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        let a = ConsultationSession::new();
        let b = ConsultationSession::new();
        assert_ne!(a.id, b.id);
    }
}
