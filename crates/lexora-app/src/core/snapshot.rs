//! State snapshot for frontends
//!
//! A serializable, self-contained view of the engine at one instant.
//! Frontends render from this and never reach into engine internals.

use crate::access::NavSection;
use lexora_core::{Branch, BranchId, CapabilitySet, ResourceKind, User};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position in the session state machine.
///
/// ```text
/// Anonymous → Authenticating → AwaitingBranch (super-admin only)
///           → BranchScoped → (loop on reselect) → Anonymous
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No session
    Anonymous,
    /// Login in flight
    Authenticating,
    /// Authenticated super-admin with no branch picked yet; the UI shows
    /// the "select a branch" state and branch-scoped actions fail fast
    AwaitingBranch,
    /// Authenticated with an active branch
    BranchScoped,
}

/// One immutable view of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Session state machine position
    pub phase: SessionPhase,
    /// The authenticated user, if any
    pub user: Option<User>,
    /// The active branch, if any
    pub active_branch: Option<BranchId>,
    /// All branches known to this session (super-admin selection list)
    pub branches: Vec<Branch>,
    /// The capability snapshot current at capture time
    pub capabilities: CapabilitySet,
    /// Enabled menu sections, in order; empty when anonymous
    pub navigation: Vec<NavSection>,
    /// Record counts per loaded collection
    pub record_counts: BTreeMap<ResourceKind, usize>,
}

impl StateSnapshot {
    /// An anonymous snapshot: deny-all, nothing loaded.
    pub fn anonymous() -> Self {
        Self {
            phase: SessionPhase::Anonymous,
            user: None,
            active_branch: None,
            branches: Vec::new(),
            capabilities: CapabilitySet::deny_all(),
            navigation: Vec::new(),
            record_counts: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_snapshot_denies_and_hides_everything() {
        let snapshot = StateSnapshot::anonymous();
        assert_eq!(snapshot.phase, SessionPhase::Anonymous);
        assert!(snapshot.user.is_none());
        assert!(snapshot.navigation.is_empty());
        assert_eq!(snapshot.capabilities, CapabilitySet::deny_all());
    }

    #[test]
    fn test_snapshot_serializes_for_ffi() {
        let snapshot = StateSnapshot::anonymous();
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let restored: StateSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, snapshot);
    }
}
