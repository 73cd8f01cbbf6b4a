//! Role modeling for directory users
//!
//! The role/branch relationship is a tagged union rather than one record
//! with optional, ad-hoc-checked fields: a super-admin has no home branch
//! and roams freely, a branch-admin is permanently scoped to one branch,
//! and a lawyer has a home branch plus an optional override set and a
//! financial-data flag.

use crate::identifiers::BranchId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A user's role, carrying exactly the branch data that role implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Role {
    /// Administrator with no fixed branch; may operate globally or against
    /// any single selected branch.
    SuperAdmin,
    /// Administrator permanently scoped to one branch.
    BranchAdmin {
        /// The branch this admin is locked to
        home_branch: BranchId,
    },
    /// Lawyer with a home branch, an optional override set of additional
    /// branches, and an explicit financial-data grant.
    Lawyer {
        /// The lawyer's home branch
        home_branch: BranchId,
        /// Additional branches the lawyer may work against. Additive to the
        /// home branch; an empty set means home-branch-only.
        allowed_branches: BTreeSet<BranchId>,
        /// Whether this lawyer may see financial records at all.
        ///
        /// Informational on the user record: the backend reflects this
        /// grant through the capability baseline, which is the sole
        /// explicit-flag source the resolver reads. When the baseline is
        /// unavailable the resolver denies regardless of this flag.
        financial_access: bool,
    },
}

impl Role {
    /// The branch this user is locked to, if any.
    ///
    /// Super-admins return `None`; everyone else is branch-locked and the
    /// stored branch selection is ignored for them.
    pub fn home_branch(&self) -> Option<BranchId> {
        match self {
            Self::SuperAdmin => None,
            Self::BranchAdmin { home_branch } | Self::Lawyer { home_branch, .. } => {
                Some(*home_branch)
            }
        }
    }

    /// Whether this role may freely select the active branch.
    pub fn may_select_branch(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// The set of branches this role may operate against.
    ///
    /// `None` means unrestricted (super-admin). For a lawyer the override
    /// set is additive to the home branch; an empty override set yields the
    /// singleton home branch.
    pub fn effective_branches(&self) -> Option<BTreeSet<BranchId>> {
        match self {
            Self::SuperAdmin => None,
            Self::BranchAdmin { home_branch } => Some(BTreeSet::from([*home_branch])),
            Self::Lawyer {
                home_branch,
                allowed_branches,
                ..
            } => {
                let mut branches = allowed_branches.clone();
                branches.insert(*home_branch);
                Some(branches)
            }
        }
    }

    /// Whether this role may operate against the given branch.
    pub fn may_access_branch(&self, branch: BranchId) -> bool {
        match self.effective_branches() {
            None => true,
            Some(branches) => branches.contains(&branch),
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::BranchAdmin { .. } => "branch_admin",
            Self::Lawyer { .. } => "lawyer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch() -> BranchId {
        BranchId::new()
    }

    #[test]
    fn test_super_admin_is_unrestricted() {
        let role = Role::SuperAdmin;
        assert_eq!(role.home_branch(), None);
        assert!(role.may_select_branch());
        assert_eq!(role.effective_branches(), None);
        assert!(role.may_access_branch(branch()));
    }

    #[test]
    fn test_branch_admin_is_locked_to_home() {
        let home = branch();
        let other = branch();
        let role = Role::BranchAdmin { home_branch: home };

        assert_eq!(role.home_branch(), Some(home));
        assert!(!role.may_select_branch());
        assert!(role.may_access_branch(home));
        assert!(!role.may_access_branch(other));
    }

    #[test]
    fn test_lawyer_empty_override_is_home_singleton() {
        let home = branch();
        let role = Role::Lawyer {
            home_branch: home,
            allowed_branches: BTreeSet::new(),
            financial_access: false,
        };

        assert_eq!(role.effective_branches(), Some(BTreeSet::from([home])));
    }

    #[test]
    fn lawyer_override_set_is_additive_to_home() {
        // Decision pinned here: the override set never excludes the home
        // branch, it only extends it.
        let home = branch();
        let extra = branch();
        let role = Role::Lawyer {
            home_branch: home,
            allowed_branches: BTreeSet::from([extra]),
            financial_access: true,
        };

        let effective = role.effective_branches().expect("lawyer is restricted");
        assert!(effective.contains(&home));
        assert!(effective.contains(&extra));
        assert_eq!(effective.len(), 2);
    }

    #[test]
    fn test_role_serde_tagged() {
        let role = Role::BranchAdmin {
            home_branch: branch(),
        };
        let json = serde_json::to_string(&role).expect("serialize");
        assert!(json.contains("\"role\":\"branch_admin\""));
        let restored: Role = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, role);
    }
}
