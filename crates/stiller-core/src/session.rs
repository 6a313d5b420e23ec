//! Per-user conversation state.
//!
//! Exactly one session slot per user. Absence of a slot is the idle state;
//! a new pack fetch silently replaces whatever was there (last-write-wins).

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::{PackKind, SourcePackItem};

/// State of the fetch-then-name conversation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    WaitingForName,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    pub state: SessionState,
    /// Item list of the fetched source pack, pre-download.
    pub items: Vec<SourcePackItem>,
    /// Name of the source pack as it appeared in the link.
    pub original_name: String,
    /// Display title of the source pack.
    pub title: String,
    pub kind: Option<PackKind>,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<i64, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the user's session; idle default when none exists.
    pub async fn get(&self, user_id: i64) -> Session {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set(&self, user_id: i64, session: Session) {
        self.sessions.write().await.insert(user_id, session);
    }

    pub async fn clear(&self, user_id: i64) {
        self.sessions.write().await.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemFormat, RemoteFileRef};

    fn item(id: &str) -> SourcePackItem {
        SourcePackItem {
            file: RemoteFileRef(id.to_string()),
            format: ItemFormat::Static,
            emoji: None,
        }
    }

    fn waiting(name: &str, items: Vec<SourcePackItem>) -> Session {
        Session {
            state: SessionState::WaitingForName,
            items,
            original_name: name.to_string(),
            title: name.to_string(),
            kind: Some(PackKind::Sticker),
        }
    }

    #[tokio::test]
    async fn missing_session_is_idle() {
        let store = SessionStore::new();
        let s = store.get(7).await;
        assert_eq!(s.state, SessionState::Idle);
        assert!(s.items.is_empty());
    }

    #[tokio::test]
    async fn new_fetch_replaces_prior_session_entirely() {
        let store = SessionStore::new();
        store
            .set(7, waiting("pack_a", vec![item("a1"), item("a2")]))
            .await;
        store.set(7, waiting("pack_b", vec![item("b1")])).await;

        let s = store.get(7).await;
        assert_eq!(s.original_name, "pack_b");
        assert_eq!(s.items.len(), 1);
        assert_eq!(s.items[0].file, RemoteFileRef("b1".to_string()));
    }

    #[tokio::test]
    async fn clear_returns_user_to_idle() {
        let store = SessionStore::new();
        store.set(7, waiting("pack_a", vec![item("a1")])).await;
        store.clear(7).await;
        assert_eq!(store.get(7).await.state, SessionState::Idle);
    }
}
