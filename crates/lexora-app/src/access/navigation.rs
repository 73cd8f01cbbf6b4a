//! # Navigation Composer
//!
//! Pure derivation of the visible menu from the current role and
//! capability snapshot. A section whose guard is false is omitted
//! entirely, never rendered-but-disabled, so the menu is always
//! consistent with what the backend will currently allow.

use lexora_core::{CapabilitySet, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A top-level section of the application menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavSection {
    /// Landing dashboard
    Dashboard,
    /// Client records
    Clients,
    /// Case files
    Cases,
    /// Contracts
    Contracts,
    /// Financial records and billing
    Financial,
    /// Tasks
    Tasks,
    /// Staff roster and lawyer management
    Staff,
    /// Document-storage integration
    Documents,
    /// Outbound-messaging integration
    Messaging,
    /// Branch administration and selection
    Branches,
}

impl NavSection {
    /// Display label for the menu entry.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Clients => "Clients",
            Self::Cases => "Cases",
            Self::Contracts => "Contracts",
            Self::Financial => "Financial",
            Self::Tasks => "Tasks",
            Self::Staff => "Staff",
            Self::Documents => "Documents",
            Self::Messaging => "Messaging",
            Self::Branches => "Branches",
        }
    }
}

impl fmt::Display for NavSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Compose the ordered list of enabled sections.
///
/// Ordering is fixed; guards decide presence. Each guard reads the
/// snapshot current at composition time, so recomposing after any
/// resolver event keeps the menu honest without a reload.
pub fn compose_navigation(role: &Role, caps: &CapabilitySet) -> Vec<NavSection> {
    let mut sections = vec![
        NavSection::Dashboard,
        NavSection::Clients,
        NavSection::Cases,
        NavSection::Contracts,
    ];

    if caps.can_access_financial_data {
        sections.push(NavSection::Financial);
    }

    sections.push(NavSection::Tasks);

    if caps.can_manage_users || caps.can_manage_lawyers {
        sections.push(NavSection::Staff);
    }
    if caps.can_access_document_integration {
        sections.push(NavSection::Documents);
    }
    if caps.can_access_messaging_integration {
        sections.push(NavSection::Messaging);
    }
    if role.may_select_branch() {
        sections.push(NavSection::Branches);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexora_core::capability::CapabilityBaseline;
    use lexora_core::capability::BranchScope;
    use lexora_core::BranchId;
    use std::collections::BTreeSet;

    fn full_caps(scope: BranchScope) -> CapabilitySet {
        CapabilitySet::from_baseline(
            &CapabilityBaseline {
                can_access_financial_data: true,
                can_create_tasks: true,
                can_edit_tasks: true,
                can_manage_users: true,
                can_manage_lawyers: true,
                can_access_document_integration: true,
                can_access_messaging_integration: true,
            },
            scope,
        )
    }

    #[test]
    fn test_deny_all_shows_only_core_sections() {
        let sections = compose_navigation(&Role::SuperAdmin, &CapabilitySet::deny_all());
        assert!(!sections.contains(&NavSection::Financial));
        assert!(!sections.contains(&NavSection::Staff));
        assert!(!sections.contains(&NavSection::Documents));
        assert!(!sections.contains(&NavSection::Messaging));
        // Super-admin still sees branch selection.
        assert!(sections.contains(&NavSection::Branches));
    }

    #[test]
    fn test_full_capabilities_show_everything_for_super_admin() {
        let sections = compose_navigation(&Role::SuperAdmin, &full_caps(BranchScope::All));
        assert_eq!(
            sections,
            vec![
                NavSection::Dashboard,
                NavSection::Clients,
                NavSection::Cases,
                NavSection::Contracts,
                NavSection::Financial,
                NavSection::Tasks,
                NavSection::Staff,
                NavSection::Documents,
                NavSection::Messaging,
                NavSection::Branches,
            ]
        );
    }

    #[test]
    fn test_branch_locked_roles_never_see_branch_section() {
        let home = BranchId::new();
        let scope = BranchScope::Restricted(BTreeSet::from([home]));

        for role in [
            Role::BranchAdmin { home_branch: home },
            Role::Lawyer {
                home_branch: home,
                allowed_branches: BTreeSet::new(),
                financial_access: true,
            },
        ] {
            let sections = compose_navigation(&role, &full_caps(scope.clone()));
            assert!(!sections.contains(&NavSection::Branches), "{role}");
        }
    }

    #[test]
    fn test_financial_section_tracks_the_flag() {
        let caps = full_caps(BranchScope::All);
        assert!(compose_navigation(&Role::SuperAdmin, &caps).contains(&NavSection::Financial));

        let downgraded = CapabilitySet {
            can_access_financial_data: false,
            ..caps
        };
        assert!(
            !compose_navigation(&Role::SuperAdmin, &downgraded).contains(&NavSection::Financial)
        );
    }

    #[test]
    fn test_either_management_flag_shows_staff() {
        let base = CapabilitySet::deny_all();
        let users_only = CapabilitySet {
            can_manage_users: true,
            ..base.clone()
        };
        let lawyers_only = CapabilitySet {
            can_manage_lawyers: true,
            ..base
        };
        assert!(compose_navigation(&Role::SuperAdmin, &users_only).contains(&NavSection::Staff));
        assert!(compose_navigation(&Role::SuperAdmin, &lawyers_only).contains(&NavSection::Staff));
    }
}
