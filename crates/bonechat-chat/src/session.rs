//! Session registry: one orchestrator per conversation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use bonechat_core::config::ChatConfig;
use bonechat_dialogue::DialogueService;
use bonechat_predictor::ImageAnalyzer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChatError;
use crate::orchestrator::ChatOrchestrator;
use crate::state::DialoguePhase;

/// Summary row for listing sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub entry_count: usize,
    pub phase: DialoguePhase,
    pub busy: bool,
}

struct SessionHandle {
    orchestrator: Arc<ChatOrchestrator>,
    started_at: DateTime<Utc>,
}

/// Owns every live session. All sessions share the same service clients.
///
/// Sessions are never expired: one lives until `remove` is called, so a
/// long-running server keeps abandoned conversations in memory.
pub struct SessionRegistry {
    analyzer: Arc<dyn ImageAnalyzer>,
    dialogue: Arc<dyn DialogueService>,
    config: ChatConfig,
    sessions: Mutex<HashMap<Uuid, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new(
        analyzer: Arc<dyn ImageAnalyzer>,
        dialogue: Arc<dyn DialogueService>,
        config: ChatConfig,
    ) -> Self {
        Self {
            analyzer,
            dialogue,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start a new, empty session and return its id.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let handle = SessionHandle {
            orchestrator: Arc::new(ChatOrchestrator::new(
                Arc::clone(&self.analyzer),
                Arc::clone(&self.dialogue),
                &self.config,
            )),
            started_at: Utc::now(),
        };
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, handle);
        tracing::info!(session_id = %id, "Session created");
        id
    }

    pub fn get(&self, id: Uuid) -> Result<Arc<ChatOrchestrator>, ChatError> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|h| Arc::clone(&h.orchestrator))
            .ok_or(ChatError::SessionNotFound(id))
    }

    /// Remove a session. Calls still running against it complete unobserved.
    pub fn remove(&self, id: Uuid) -> Result<(), ChatError> {
        let removed = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        match removed {
            Some(_) => {
                tracing::info!(session_id = %id, "Session removed");
                Ok(())
            }
            None => Err(ChatError::SessionNotFound(id)),
        }
    }

    /// Summaries of all sessions, oldest first.
    pub fn list(&self) -> Vec<SessionSummary> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let mut summaries: Vec<SessionSummary> = sessions
            .iter()
            .map(|(id, handle)| {
                let snapshot = handle.orchestrator.snapshot();
                SessionSummary {
                    id: *id,
                    started_at: handle.started_at,
                    entry_count: snapshot.transcript.len(),
                    phase: snapshot.phase,
                    busy: snapshot.busy,
                }
            })
            .collect();
        summaries.sort_by_key(|s| s.started_at);
        summaries
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonechat_dialogue::MockDialogueService;
    use bonechat_predictor::MockImageAnalyzer;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(
            Arc::new(MockImageAnalyzer::with_result("fractured", "Hand")),
            Arc::new(MockDialogueService::echo()),
            ChatConfig::default(),
        )
    }

    #[test]
    fn test_create_and_get() {
        let registry = registry();
        let id = registry.create();
        assert!(registry.get(id).is_ok());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_unknown_session() {
        let registry = registry();
        let id = Uuid::new_v4();
        assert_eq!(registry.get(id).err(), Some(ChatError::SessionNotFound(id)));
    }

    #[test]
    fn test_remove() {
        let registry = registry();
        let id = registry.create();
        registry.remove(id).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.remove(id), Err(ChatError::SessionNotFound(id)));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = registry();
        let a = registry.create();
        let b = registry.create();

        registry.get(a).unwrap().submit_image(&[1, 2, 3]).await.unwrap();

        assert_eq!(registry.get(a).unwrap().transcript().len(), 4);
        assert!(registry.get(b).unwrap().transcript().is_empty());
        assert_eq!(
            registry.get(a).unwrap().snapshot().phase,
            DialoguePhase::AwaitingFollowUp
        );
        assert_eq!(registry.get(b).unwrap().snapshot().phase, DialoguePhase::Idle);
    }

    #[tokio::test]
    async fn test_list_reports_entry_counts() {
        let registry = registry();
        let id = registry.create();
        registry.get(id).unwrap().submit_text("hello").await;

        let summaries = registry.list();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, id);
        assert_eq!(summaries[0].entry_count, 2);
        assert_eq!(summaries[0].phase, DialoguePhase::Idle);
        assert!(!summaries[0].busy);
    }
}
