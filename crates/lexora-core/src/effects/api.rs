//! Directory API effect trait
//!
//! The backend surface the engine consumes: login, the capability
//! endpoint, the branch list, and per-resource CRUD. All calls except
//! login require the bearer token; all record calls carry a branch id
//! drawn from the active branch context.
//!
//! Implementations classify their responses into [`ApiError`] /
//! [`LoginError`] before returning, so the engine never sees raw status
//! codes.

use crate::capability::CapabilityBaseline;
use crate::directory::{Branch, Credentials, LoginSuccess};
use crate::errors::ApiError;
use crate::identifiers::BranchId;
use crate::resource::ResourceKind;
use async_trait::async_trait;

/// Opaque record payload.
///
/// Record schemas and validation are external collaborators; the engine
/// moves records around without inspecting them.
pub type RecordPayload = serde_json::Value;

/// Login failure modes, distinguished by backend status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// The email/password pair was rejected
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The account exists but is locked
    #[error("account locked")]
    AccountLocked,
    /// The backend failed internally
    #[error("server fault: {message}")]
    ServerFault {
        /// Backend-provided description
        message: String,
    },
    /// The request never produced a classified response
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },
}

impl LoginError {
    /// Create a server fault
    pub fn server_fault(message: impl Into<String>) -> Self {
        Self::ServerFault {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Backend directory surface.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Exchange credentials for a bearer token and user snapshot.
    async fn login(&self, credentials: &Credentials) -> Result<LoginSuccess, LoginError>;

    /// Fetch the explicit capability baseline for the token's user.
    async fn fetch_capabilities(&self, token: &str) -> Result<CapabilityBaseline, ApiError>;

    /// List all branches. Used for super-admin selection and to validate a
    /// persisted selection.
    async fn list_branches(&self, token: &str) -> Result<Vec<Branch>, ApiError>;

    /// List records of one kind scoped to one branch.
    async fn list_records(
        &self,
        token: &str,
        kind: ResourceKind,
        branch: BranchId,
    ) -> Result<Vec<RecordPayload>, ApiError>;

    /// Create a record of one kind under one branch.
    async fn create_record(
        &self,
        token: &str,
        kind: ResourceKind,
        branch: BranchId,
        payload: RecordPayload,
    ) -> Result<RecordPayload, ApiError>;
}
