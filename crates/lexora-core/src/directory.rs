//! Directory records fetched from the identity backend
//!
//! Users and branches are created and edited by administrative CRUD that
//! lives outside this engine; here they are read-only snapshots attached
//! to a session at login.

use crate::identifiers::{BranchId, UserId};
use crate::role::Role;
use serde::{Deserialize, Serialize};

/// A directory user as returned by the login call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Directory identifier
    pub id: UserId,
    /// Login email address
    pub email: String,
    /// Name shown in the UI
    pub display_name: String,
    /// Role with its branch data
    #[serde(flatten)]
    pub role: Role,
}

impl User {
    /// The branch this user is locked to, if any.
    pub fn home_branch(&self) -> Option<BranchId> {
        self.role.home_branch()
    }
}

/// An organizational branch office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch identifier
    pub id: BranchId,
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Responsible person's name
    pub responsible: String,
}

/// Login credentials.
///
/// Password handling (hashing, token issuance) is the identity backend's
/// concern; this engine only carries the credentials to the login call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login email address
    pub email: String,
    /// Plaintext password, forwarded to the backend
    pub password: String,
}

impl Credentials {
    /// Create credentials from email and password
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful login payload: bearer token plus the user snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSuccess {
    /// Bearer token attached to all subsequent requests
    pub token: String,
    /// The authenticated user's directory snapshot
    pub user: User,
}
