//! # Session Module
//!
//! Custody of the authentication token, the user snapshot, and the
//! active-branch selection. The session manager is the only holder of the
//! [`SessionStore`] handle, so every persisted-state read and write in the
//! engine funnels through here, and logout is a single atomic reset
//! rather than a sequence of independent clears.

mod branch;

pub use branch::resolve_active_branch;

use lexora_core::effects::{PersistedSession, SessionStore, StoreError};
use lexora_core::{BranchId, LoginSuccess, SessionGeneration, User};
use std::sync::Arc;
use tracing::{debug, info};

/// In-memory session state.
#[derive(Debug, Clone)]
enum SessionState {
    /// No session
    Anonymous,
    /// Authenticated session
    Active {
        token: String,
        user: User,
        active_branch: Option<BranchId>,
    },
}

/// Owner of the session lifecycle: login, logout, branch persistence, and
/// the generation counter that stamps every outbound fetch.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    state: SessionState,
    generation: SessionGeneration,
}

impl SessionManager {
    /// Create an anonymous session manager over a store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            state: SessionState::Anonymous,
            generation: SessionGeneration::INITIAL,
        }
    }

    /// Whether a session is active.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    /// The bearer token, if authenticated.
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Active { token, .. } => Some(token),
            SessionState::Anonymous => None,
        }
    }

    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Active { user, .. } => Some(user),
            SessionState::Anonymous => None,
        }
    }

    /// The active branch, if one is selected.
    pub fn active_branch(&self) -> Option<BranchId> {
        match &self.state {
            SessionState::Active { active_branch, .. } => *active_branch,
            SessionState::Anonymous => None,
        }
    }

    /// The current session generation. Fetches dispatched under an older
    /// generation are stale and must be dropped on completion.
    pub fn generation(&self) -> SessionGeneration {
        self.generation
    }

    /// The branch selection left behind by a previous session, if the
    /// store has one. Read-only; resolution against the freshly loaded
    /// user happens in [`resolve_active_branch`].
    pub async fn stored_selection(&self) -> Result<Option<BranchId>, StoreError> {
        Ok(self.store.read().await?.and_then(|s| s.active_branch))
    }

    /// The whole persisted session, for startup restore.
    pub async fn persisted(&self) -> Result<Option<PersistedSession>, StoreError> {
        self.store.read().await
    }

    /// Adopt a successful login with its resolved active branch.
    ///
    /// Persists all three keys together and bumps the generation so
    /// nothing dispatched before this point can land afterwards. Nothing
    /// is persisted if the write fails.
    pub async fn establish(
        &mut self,
        login: LoginSuccess,
        active_branch: Option<BranchId>,
    ) -> Result<(), StoreError> {
        self.store
            .write(&PersistedSession {
                token: login.token.clone(),
                user: login.user.clone(),
                active_branch,
            })
            .await?;

        info!(user = %login.user.id, role = %login.user.role, "session established");
        self.state = SessionState::Active {
            token: login.token,
            user: login.user,
            active_branch,
        };
        self.generation = self.generation.next();
        Ok(())
    }

    /// Persist a new active branch for the current session.
    ///
    /// Bumps the generation: this is the hard invalidation barrier for
    /// every branch-scoped collection. Role checks belong to the caller;
    /// this only handles custody.
    pub async fn set_active_branch(
        &mut self,
        branch: Option<BranchId>,
    ) -> Result<(), StoreError> {
        let SessionState::Active {
            token,
            user,
            active_branch,
        } = &mut self.state
        else {
            return Err(StoreError::backend("no active session"));
        };

        self.store
            .write(&PersistedSession {
                token: token.clone(),
                user: user.clone(),
                active_branch: branch,
            })
            .await?;

        debug!(branch = ?branch, "active branch changed");
        *active_branch = branch;
        self.generation = self.generation.next();
        Ok(())
    }

    /// End the session: one atomic reset of token, user, and branch.
    ///
    /// In-memory state resets before the store round-trip, so even a
    /// failing store leaves no partial session behind; the store error is
    /// still surfaced.
    pub async fn clear(&mut self) -> Result<(), StoreError> {
        info!("session cleared");
        self.state = SessionState::Anonymous;
        self.generation = self.generation.next();
        self.store.clear().await
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("authenticated", &self.is_authenticated())
            .field("active_branch", &self.active_branch())
            .field("generation", &self.generation)
            .finish()
    }
}
