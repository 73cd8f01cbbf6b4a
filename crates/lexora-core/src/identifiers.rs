//! Core identifier types used across the Lexora engine
//!
//! This module provides the newtype identifiers for users and branches plus
//! the session generation counter that backs the invalidation barrier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// User identifier
///
/// Uniquely identifies a user in the firm directory, regardless of role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create a new random user ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user-{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<UserId> for Uuid {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Branch identifier
///
/// Identifies an organizational office holding an isolated slice of
/// business data. Every branch-scoped request carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(pub Uuid);

impl BranchId {
    /// Create a new random branch ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BranchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "branch-{}", self.0)
    }
}

impl FromStr for BranchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("branch-").unwrap_or(s);
        Ok(Self(Uuid::parse_str(raw)?))
    }
}

impl From<Uuid> for BranchId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<BranchId> for Uuid {
    fn from(id: BranchId) -> Self {
        id.0
    }
}

/// Session generation counter
///
/// Bumped on login, logout, and branch change. A response produced under an
/// older generation must never be applied to current state; the fetcher
/// compares the generation captured at dispatch against the live one at
/// completion and silently drops mismatches.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SessionGeneration(pub u64);

impl SessionGeneration {
    /// The generation of a fresh anonymous session
    pub const INITIAL: Self = Self(0);

    /// Return the next generation
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}
