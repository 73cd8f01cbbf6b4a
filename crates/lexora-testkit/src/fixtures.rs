//! Ready-made users, branches, baselines, and records
//!
//! Every fixture takes the identifying detail as an argument and invents
//! the rest, so tests read as scenario descriptions instead of setup.

use lexora_core::effects::RecordPayload;
use lexora_core::{Branch, BranchId, CapabilityBaseline, Credentials, Role, User, UserId};
use std::collections::BTreeSet;

/// A branch office with a deterministic-looking name.
pub fn branch(name: &str) -> Branch {
    Branch {
        id: BranchId::new(),
        name: name.to_string(),
        address: format!("1 {name} Street"),
        responsible: format!("{name} Manager"),
    }
}

/// A super-admin user.
pub fn super_admin(email: &str) -> User {
    user(email, Role::SuperAdmin)
}

/// A branch-admin locked to the given branch.
pub fn branch_admin(email: &str, home: BranchId) -> User {
    user(email, Role::BranchAdmin { home_branch: home })
}

/// A lawyer with no branch overrides and no financial access.
pub fn lawyer(email: &str, home: BranchId) -> User {
    lawyer_with(email, home, BTreeSet::new(), false)
}

/// A lawyer with an explicit override set and financial flag.
pub fn lawyer_with(
    email: &str,
    home: BranchId,
    allowed_branches: BTreeSet<BranchId>,
    financial_access: bool,
) -> User {
    user(
        email,
        Role::Lawyer {
            home_branch: home,
            allowed_branches,
            financial_access,
        },
    )
}

fn user(email: &str, role: Role) -> User {
    User {
        id: UserId::new(),
        email: email.to_string(),
        display_name: email.split('@').next().unwrap_or(email).to_string(),
        role,
    }
}

/// Credentials matching the password [`ScriptedDirectory`] registers users
/// under.
///
/// [`ScriptedDirectory`]: crate::ScriptedDirectory
pub fn credentials(email: &str) -> Credentials {
    Credentials::new(email, crate::directory::TEST_PASSWORD)
}

/// A baseline with every explicit flag granted.
pub fn full_baseline() -> CapabilityBaseline {
    CapabilityBaseline {
        can_access_financial_data: true,
        can_create_tasks: true,
        can_edit_tasks: true,
        can_manage_users: true,
        can_manage_lawyers: true,
        can_access_document_integration: true,
        can_access_messaging_integration: true,
    }
}

/// A baseline with only the financial flag granted.
pub fn financial_baseline() -> CapabilityBaseline {
    CapabilityBaseline {
        can_access_financial_data: true,
        ..CapabilityBaseline::default()
    }
}

/// An opaque record payload with a recognizable label.
pub fn record(label: &str) -> RecordPayload {
    serde_json::json!({ "label": label })
}

/// A batch of labeled records.
pub fn records(prefix: &str, count: usize) -> Vec<RecordPayload> {
    (0..count).map(|i| record(&format!("{prefix}-{i}"))).collect()
}
