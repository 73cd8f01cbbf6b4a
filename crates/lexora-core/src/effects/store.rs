//! Session store effect trait
//!
//! Persisted local state is exactly three keys: the bearer token, the
//! serialized user snapshot, and the serialized active-branch selection.
//! They are written together on login and branch change and cleared
//! together on logout; the trait exposes no per-key surface so partial
//! writes cannot exist. Only the session manager holds a store handle; no
//! other subsystem reads or writes these keys.

use crate::directory::User;
use crate::identifiers::BranchId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The persisted session record, restored on reload and revalidated
/// against the freshly loaded user on every login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    /// Bearer token
    pub token: String,
    /// User snapshot from the login that produced the token
    pub user: User,
    /// Active-branch selection, if one was made
    pub active_branch: Option<BranchId>,
}

/// Local storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backing store rejected the read or write
    #[error("storage error: {message}")]
    Backend {
        /// Description of the storage failure
        message: String,
    },
    /// A previously persisted value no longer deserializes
    #[error("corrupt persisted state: {message}")]
    Corrupt {
        /// Description of the corruption
        message: String,
    },
}

impl StoreError {
    /// Create a backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Create a corruption error
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}

/// Custody of the persisted session keys.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Write all three keys as one unit.
    async fn write(&self, session: &PersistedSession) -> Result<(), StoreError>;

    /// Read the persisted session, if any. A corrupt record surfaces as an
    /// error so the caller can fall back to anonymous instead of guessing.
    async fn read(&self) -> Result<Option<PersistedSession>, StoreError>;

    /// Clear all three keys as one unit.
    async fn clear(&self) -> Result<(), StoreError>;
}
