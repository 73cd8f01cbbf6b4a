//! In-memory session store double

use async_trait::async_trait;
use lexora_core::effects::{PersistedSession, SessionStore, StoreError};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct StoreState {
    session: Option<PersistedSession>,
    fail_next_write: Option<StoreError>,
    fail_next_read: Option<StoreError>,
}

/// In-memory [`SessionStore`] with scriptable one-shot failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a persisted session, as if a previous run
    /// left one behind.
    pub fn with_session(session: PersistedSession) -> Self {
        let store = Self::new();
        store.state.lock().session = Some(session);
        store
    }

    /// Make the next write fail.
    pub fn fail_next_write(&self, error: StoreError) {
        self.state.lock().fail_next_write = Some(error);
    }

    /// Make the next read fail, as a corrupt record would.
    pub fn fail_next_read(&self, error: StoreError) {
        self.state.lock().fail_next_read = Some(error);
    }

    /// What is persisted right now.
    pub fn persisted(&self) -> Option<PersistedSession> {
        self.state.lock().session.clone()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn write(&self, session: &PersistedSession) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if let Some(error) = state.fail_next_write.take() {
            return Err(error);
        }
        state.session = Some(session.clone());
        Ok(())
    }

    async fn read(&self) -> Result<Option<PersistedSession>, StoreError> {
        let mut state = self.state.lock();
        if let Some(error) = state.fail_next_read.take() {
            return Err(error);
        }
        Ok(state.session.clone())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if let Some(error) = state.fail_next_write.take() {
            return Err(error);
        }
        state.session = None;
        Ok(())
    }
}
