use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// In-memory registry of live chat sessions.
///
/// Each session sits behind its own mutex, so a long-running message in
/// one session never blocks the others.
pub struct SessionStore<S> {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<S>>>>,
}

impl<S> SessionStore<S> {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, session: S) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Mutex<S>>> {
        self.sessions.read().await.get(id).map(Arc::clone)
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl<S> Default for SessionStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::new();
        assert!(store.is_empty().await);

        let id = store.insert(41usize).await;
        assert_eq!(store.len().await, 1);

        {
            let session = store.get(&id).await.expect("session exists");
            *session.lock().await += 1;
        }
        assert_eq!(*store.get(&id).await.unwrap().lock().await, 42);

        assert!(store.remove(&id).await);
        assert!(!store.remove(&id).await);
        assert!(store.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = SessionStore::new();
        let a = store.insert(()).await;
        let b = store.insert(()).await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }
}
