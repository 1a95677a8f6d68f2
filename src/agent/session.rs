use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::llm::ChatMessage;

/// In-memory conversation history keyed by session id.
///
/// Each session keeps at most `limit` messages; older ones are dropped first.
/// Nothing survives a restart.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Vec<ChatMessage>>>,
    limit: usize,
}

impl SessionStore {
    /// Create a store bounded to `limit` messages per session
    pub fn new(limit: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            limit,
        }
    }

    /// Snapshot of a session's history; empty for unknown sessions
    pub async fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Append messages to a session, creating it on first use
    pub async fn append(&self, session_id: &str, messages: Vec<ChatMessage>) {
        let mut sessions = self.sessions.write().await;
        let history = sessions.entry(session_id.to_string()).or_default();
        history.extend(messages);

        if history.len() > self.limit {
            let excess = history.len() - self.limit;
            history.drain(..excess);
        }

        debug!(session_id = %session_id, messages = history.len(), "Session updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let store = SessionStore::new(20);
        assert!(store.history("default_session").await.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(20);
        store
            .append("a", vec![ChatMessage::user("q1"), ChatMessage::assistant("a1")])
            .await;
        store.append("b", vec![ChatMessage::user("q2")]).await;

        assert_eq!(store.history("a").await.len(), 2);
        assert_eq!(store.history("b").await, vec![ChatMessage::user("q2")]);
        assert!(store.history("c").await.is_empty());
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let store = SessionStore::new(4);
        for i in 0..3 {
            store
                .append(
                    "s",
                    vec![
                        ChatMessage::user(format!("q{}", i)),
                        ChatMessage::assistant(format!("a{}", i)),
                    ],
                )
                .await;
        }

        let history = store.history("s").await;
        assert_eq!(history.len(), 4);
        assert_eq!(history[0], ChatMessage::user("q1"));
        assert_eq!(history[3], ChatMessage::assistant("a2"));
    }
}
