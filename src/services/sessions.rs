use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::models::Session;

/// In-memory conversation progress keyed by requester.
///
/// Each requester has its own lock, held for the whole handling of one event,
/// so steps from the same requester run one at a time.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, Arc<AsyncMutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, user_id: i64) -> anyhow::Result<Arc<AsyncMutex<Session>>> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        Ok(Arc::clone(sessions.entry(user_id).or_default()))
    }

    pub async fn lock(&self, user_id: i64) -> anyhow::Result<OwnedMutexGuard<Session>> {
        Ok(self.entry(user_id)?.lock_owned().await)
    }

    pub async fn get(&self, user_id: i64) -> anyhow::Result<Session> {
        Ok(self.lock(user_id).await?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_requester_starts_idle() {
        let store = SessionStore::new();
        assert_eq!(store.get(1).await.unwrap(), Session::Idle);
    }

    #[tokio::test]
    async fn test_sessions_are_per_requester() {
        let store = SessionStore::new();
        *store.lock(1).await.unwrap() = Session::AwaitingService;

        assert_eq!(store.get(1).await.unwrap(), Session::AwaitingService);
        assert_eq!(store.get(2).await.unwrap(), Session::Idle);
    }

    #[tokio::test]
    async fn test_same_requester_is_serialized() {
        let store = Arc::new(SessionStore::new());
        let guard = store.lock(1).await.unwrap();

        let other = Arc::clone(&store);
        let waiter = tokio::spawn(async move { other.get(1).await.unwrap() });

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(guard);
        assert_eq!(waiter.await.unwrap(), Session::Idle);
    }
}
