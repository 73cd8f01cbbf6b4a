//! Capability set, baseline payload, and capability keys
//!
//! A [`CapabilitySet`] is derived state, never persisted. It defaults to
//! deny-all, is recomputed whenever identity or active branch changes, and
//! is corrected in place by implicit inference from live authorization
//! outcomes. The resolver in `lexora-app` owns the recomputation; this
//! module only defines the shape.

use crate::identifiers::BranchId;
use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which branches a session may read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "branches", rename_all = "snake_case")]
pub enum BranchScope {
    /// Unrestricted (super-admin): every branch is in scope.
    All,
    /// Restricted to an explicit set of branches.
    Restricted(BTreeSet<BranchId>),
}

impl BranchScope {
    /// Whether the given branch is inside this scope.
    pub fn allows(&self, branch: BranchId) -> bool {
        match self {
            Self::All => true,
            Self::Restricted(branches) => branches.contains(&branch),
        }
    }

    /// Derive the scope from a role. Never trusted from the wire.
    pub fn from_role(role: &Role) -> Self {
        match role.effective_branches() {
            None => Self::All,
            Some(branches) => Self::Restricted(branches),
        }
    }
}

/// Addressable boolean capabilities, used by implicit inference to flip a
/// single flag without touching the rest of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKey {
    /// May see financial records and dashboard revenue figures
    FinancialData,
    /// May create tasks
    CreateTasks,
    /// May edit tasks
    EditTasks,
    /// May manage staff accounts
    ManageUsers,
    /// May manage lawyer profiles and grants
    ManageLawyers,
    /// May use the document-storage integration
    DocumentIntegration,
    /// May use the outbound-messaging integration
    MessagingIntegration,
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FinancialData => "financial_data",
            Self::CreateTasks => "create_tasks",
            Self::EditTasks => "edit_tasks",
            Self::ManageUsers => "manage_users",
            Self::ManageLawyers => "manage_lawyers",
            Self::DocumentIntegration => "document_integration",
            Self::MessagingIntegration => "messaging_integration",
        };
        write!(f, "{label}")
    }
}

/// The capability baseline returned by the capability endpoint.
///
/// Carries only the explicit flags. Every field defaults to `false`, so a
/// partial or empty payload degrades to deny rather than allow. The branch
/// scope is deliberately absent: it is always derived locally from the
/// role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityBaseline {
    /// Financial records and revenue figures
    pub can_access_financial_data: bool,
    /// Task creation
    pub can_create_tasks: bool,
    /// Task editing
    pub can_edit_tasks: bool,
    /// Staff account management
    pub can_manage_users: bool,
    /// Lawyer profile management
    pub can_manage_lawyers: bool,
    /// Document-storage integration
    pub can_access_document_integration: bool,
    /// Outbound-messaging integration
    pub can_access_messaging_integration: bool,
}

/// The derived permission snapshot governing what the current session may
/// see or do.
///
/// Immutable once produced: the resolver emits a fresh snapshot per event
/// rather than mutating one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// Financial records and revenue figures
    pub can_access_financial_data: bool,
    /// Branches this session may read
    pub accessible_branches: BranchScope,
    /// Task creation
    pub can_create_tasks: bool,
    /// Task editing
    pub can_edit_tasks: bool,
    /// Staff account management
    pub can_manage_users: bool,
    /// Lawyer profile management
    pub can_manage_lawyers: bool,
    /// Document-storage integration
    pub can_access_document_integration: bool,
    /// Outbound-messaging integration
    pub can_access_messaging_integration: bool,
}

impl CapabilitySet {
    /// The maximally restrictive set: every flag off, no branches in scope.
    ///
    /// This is the value before the first computation and after logout, so
    /// a snapshot read too early denies instead of allowing.
    pub fn deny_all() -> Self {
        Self {
            can_access_financial_data: false,
            accessible_branches: BranchScope::Restricted(BTreeSet::new()),
            can_create_tasks: false,
            can_edit_tasks: false,
            can_manage_users: false,
            can_manage_lawyers: false,
            can_access_document_integration: false,
            can_access_messaging_integration: false,
        }
    }

    /// Build a snapshot from a baseline payload and a role-derived scope.
    pub fn from_baseline(baseline: &CapabilityBaseline, scope: BranchScope) -> Self {
        Self {
            can_access_financial_data: baseline.can_access_financial_data,
            accessible_branches: scope,
            can_create_tasks: baseline.can_create_tasks,
            can_edit_tasks: baseline.can_edit_tasks,
            can_manage_users: baseline.can_manage_users,
            can_manage_lawyers: baseline.can_manage_lawyers,
            can_access_document_integration: baseline.can_access_document_integration,
            can_access_messaging_integration: baseline.can_access_messaging_integration,
        }
    }

    /// Read a flag by key.
    pub fn get(&self, key: CapabilityKey) -> bool {
        match key {
            CapabilityKey::FinancialData => self.can_access_financial_data,
            CapabilityKey::CreateTasks => self.can_create_tasks,
            CapabilityKey::EditTasks => self.can_edit_tasks,
            CapabilityKey::ManageUsers => self.can_manage_users,
            CapabilityKey::ManageLawyers => self.can_manage_lawyers,
            CapabilityKey::DocumentIntegration => self.can_access_document_integration,
            CapabilityKey::MessagingIntegration => self.can_access_messaging_integration,
        }
    }

    /// Return a copy with one flag replaced.
    pub fn with_flag(&self, key: CapabilityKey, value: bool) -> Self {
        let mut next = self.clone();
        let slot = match key {
            CapabilityKey::FinancialData => &mut next.can_access_financial_data,
            CapabilityKey::CreateTasks => &mut next.can_create_tasks,
            CapabilityKey::EditTasks => &mut next.can_edit_tasks,
            CapabilityKey::ManageUsers => &mut next.can_manage_users,
            CapabilityKey::ManageLawyers => &mut next.can_manage_lawyers,
            CapabilityKey::DocumentIntegration => &mut next.can_access_document_integration,
            CapabilityKey::MessagingIntegration => &mut next.can_access_messaging_integration,
        };
        *slot = value;
        next
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::deny_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_all_denies_everything() {
        let caps = CapabilitySet::deny_all();
        for key in [
            CapabilityKey::FinancialData,
            CapabilityKey::CreateTasks,
            CapabilityKey::EditTasks,
            CapabilityKey::ManageUsers,
            CapabilityKey::ManageLawyers,
            CapabilityKey::DocumentIntegration,
            CapabilityKey::MessagingIntegration,
        ] {
            assert!(!caps.get(key), "{key} must default to deny");
        }
        assert!(!caps.accessible_branches.allows(BranchId::new()));
    }

    #[test]
    fn test_default_is_deny_all() {
        assert_eq!(CapabilitySet::default(), CapabilitySet::deny_all());
    }

    #[test]
    fn test_partial_baseline_payload_degrades_to_deny() {
        // Missing fields deserialize to false, never true.
        let baseline: CapabilityBaseline =
            serde_json::from_str(r#"{"can_create_tasks": true}"#).expect("deserialize");
        assert!(baseline.can_create_tasks);
        assert!(!baseline.can_access_financial_data);
        assert!(!baseline.can_manage_users);
    }

    #[test]
    fn test_with_flag_leaves_original_untouched() {
        let caps = CapabilitySet::deny_all();
        let updated = caps.with_flag(CapabilityKey::FinancialData, true);
        assert!(updated.can_access_financial_data);
        assert!(!caps.can_access_financial_data);
        assert_eq!(updated.can_create_tasks, caps.can_create_tasks);
    }

    #[test]
    fn test_branch_scope_from_role() {
        assert_eq!(BranchScope::from_role(&Role::SuperAdmin), BranchScope::All);

        let home = BranchId::new();
        let scope = BranchScope::from_role(&Role::BranchAdmin { home_branch: home });
        assert!(scope.allows(home));
        assert!(!scope.allows(BranchId::new()));
    }
}
