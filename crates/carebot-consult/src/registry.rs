//! In-memory registry of live consultation sessions.
//!
//! Each session sits behind its own async mutex, held for a whole turn, so
//! one session processes a single input at a time while other sessions
//! proceed independently. Sessions idle for longer than the configured
//! timeout are evicted on the next lookup or creation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::conversation::ConsultationSession;
use crate::error::ConsultError;

/// Handle to one session's state.
pub type SharedSession = Arc<tokio::sync::Mutex<ConsultationSession>>;

#[derive(Debug)]
struct Entry {
    session: SharedSession,
    last_active: Instant,
}

/// Sessions keyed by id. Nothing is persisted. The `Default` registry never
/// expires sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Entry>>,
    /// `None` keeps sessions until they are removed.
    idle_timeout: Option<Duration>,
}

impl SessionRegistry {
    /// A registry that drops sessions idle for longer than `idle_timeout`.
    pub fn with_idle_timeout(idle_timeout: Option<Duration>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Register a fresh, empty session.
    pub fn create(&self) -> Result<(Uuid, SharedSession), ConsultError> {
        let session = ConsultationSession::new();
        let id = session.id;
        let shared = Arc::new(tokio::sync::Mutex::new(session));

        let mut sessions = self.lock()?;
        self.evict_idle(&mut sessions);
        sessions.insert(
            id,
            Entry {
                session: Arc::clone(&shared),
                last_active: Instant::now(),
            },
        );
        tracing::debug!(session_id = %id, live = sessions.len(), "Session created");
        Ok((id, shared))
    }

    /// Look up a session and mark it active. An idle session is evicted and
    /// reported as not found.
    pub fn get(&self, id: Uuid) -> Result<SharedSession, ConsultError> {
        let mut sessions = self.lock()?;
        self.evict_idle(&mut sessions);
        let entry = sessions
            .get_mut(&id)
            .ok_or(ConsultError::SessionNotFound(id))?;
        entry.last_active = Instant::now();
        Ok(Arc::clone(&entry.session))
    }

    /// Forget a session. Its history is dropped once no handler holds it.
    pub fn remove(&self, id: Uuid) -> Result<(), ConsultError> {
        match self.lock()?.remove(&id) {
            Some(_) => {
                tracing::debug!(session_id = %id, "Session ended");
                Ok(())
            }
            None => Err(ConsultError::SessionNotFound(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, Entry>) {
        let Some(timeout) = self.idle_timeout else {
            return;
        };
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_active.elapsed() <= timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, live = sessions.len(), "Idle sessions evicted");
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Entry>>, ConsultError> {
        self.sessions
            .lock()
            .map_err(|e| ConsultError::State(format!("session lock poisoned: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carebot_core::types::Turn;

    #[test]
    fn test_create_and_get() {
        let registry = SessionRegistry::default();
        assert!(registry.is_empty());

        let (id, _) = registry.create().unwrap();
        assert_eq!(registry.len(), 1);
        let session = registry.get(id).unwrap();
        assert_eq!(session.blocking_lock().id, id);
    }

    #[test]
    fn test_get_unknown_session() {
        let registry = SessionRegistry::default();
        let id = Uuid::new_v4();
        let err = registry.get(id).unwrap_err();
        assert!(matches!(err, ConsultError::SessionNotFound(missing) if missing == id));
    }

    #[test]
    fn test_remove_session() {
        let registry = SessionRegistry::default();
        let (id, _) = registry.create().unwrap();
        registry.remove(id).unwrap();
        assert!(registry.get(id).is_err());
        assert!(matches!(
            registry.remove(id),
            Err(ConsultError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_idle_session_is_evicted() {
        let registry = SessionRegistry::with_idle_timeout(Some(Duration::from_millis(150)));
        let (idle, _) = registry.create().unwrap();
        std::thread::sleep(Duration::from_millis(400));

        let (fresh, _) = registry.create().unwrap();
        assert_eq!(registry.len(), 1);
        assert!(matches!(
            registry.get(idle),
            Err(ConsultError::SessionNotFound(id)) if id == idle
        ));
        assert!(registry.get(fresh).is_ok());
    }

    #[test]
    fn test_lookup_keeps_session_alive() {
        let registry = SessionRegistry::with_idle_timeout(Some(Duration::from_millis(500)));
        let (id, _) = registry.create().unwrap();

        for _ in 0..4 {
            std::thread::sleep(Duration::from_millis(200));
            assert!(registry.get(id).is_ok());
        }
    }

    #[test]
    fn test_no_timeout_keeps_sessions() {
        let registry = SessionRegistry::with_idle_timeout(None);
        let (id, _) = registry.create().unwrap();
        std::thread::sleep(Duration::from_millis(20));
        registry.create().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get(id).is_ok());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::default();
        let (a, _) = registry.create().unwrap();
        let (b, _) = registry.create().unwrap();

        registry
            .get(a)
            .unwrap()
            .lock()
            .await
            .seed_if_empty("hello");

        assert_eq!(registry.get(a).unwrap().lock().await.turns().len(), 1);
        assert!(registry.get(b).unwrap().lock().await.turns().is_empty());
        assert_eq!(
            registry.get(a).unwrap().lock().await.turns()[0],
            Turn::opening("hello")
        );
    }
}
