//! # Branch Context
//!
//! Resolution of the single active branch for a session. Whether the
//! branch is locked or selectable falls out of the role: a home branch
//! locks the session to it and any stored selection is ignored; only a
//! super-admin resolves through the stored selection, and only when it
//! still exists in the current branch list.

use lexora_core::{Branch, BranchId, User};
use tracing::debug;

/// Resolve the active branch for a freshly loaded user.
///
/// Precedence:
/// 1. the user's home branch, if any (locked; `stored` is ignored)
/// 2. the stored selection, if it still exists in `branches`
/// 3. none (no branch active)
///
/// A stale persisted selection for a now-branch-locked user is discarded
/// by rule 1; a selection pointing at a deleted branch is discarded by
/// rule 2.
pub fn resolve_active_branch(
    user: &User,
    stored: Option<BranchId>,
    branches: &[Branch],
) -> Option<BranchId> {
    if let Some(home) = user.home_branch() {
        if stored.is_some() && stored != Some(home) {
            debug!(user = %user.id, stale = ?stored, "discarding stale branch selection");
        }
        return Some(home);
    }

    match stored {
        Some(selection) if branches.iter().any(|b| b.id == selection) => Some(selection),
        Some(selection) => {
            debug!(user = %user.id, %selection, "stored branch no longer exists");
            None
        }
        None => None,
    }
}
