//! # Permission Resolver
//!
//! Reduces access events into capability snapshots.
//!
//! The capability set has two sources that can disagree: the explicit
//! baseline adopted at login, and implicit inference from the
//! authorization outcome of ordinary resource calls. Both flow through one
//! reducer here instead of scattered mutations at call sites:
//!
//! ```text
//! LoggedIn → BaselineFetched/BaselineUnavailable
//!          → ResourceAllowed/ResourceDenied (repeat)
//!          → BranchChanged (repeat) → LoggedOut
//! ```
//!
//! Each event yields a fresh immutable snapshot. The most recent implicit
//! signal wins over the baseline, because the UI must never offer an
//! action the backend will certainly reject.

use lexora_core::capability::BranchScope;
use lexora_core::{
    BranchId, CapabilityBaseline, CapabilityKey, CapabilitySet, ResourceKind, Role,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Whether an authorization outcome was observed on a read or a create.
///
/// The distinction matters for inference: a 403 on a financial *list*
/// speaks for the financial flag, a 403 on a task *create* speaks for the
/// task-creation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Collection fetch
    Read,
    /// Record creation
    Create,
}

impl AccessMode {
    /// The capability an outcome in this mode speaks for on a given kind.
    fn capability(&self, kind: ResourceKind) -> Option<CapabilityKey> {
        match self {
            Self::Read => kind.read_capability(),
            Self::Create => kind.create_capability(),
        }
    }
}

/// One event in the ordered access stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessEvent {
    /// A user authenticated; the role pins the branch scope.
    LoggedIn {
        /// The authenticated user's role
        role: Role,
    },
    /// The capability endpoint answered.
    BaselineFetched {
        /// Explicit flags from the backend
        baseline: CapabilityBaseline,
    },
    /// The capability endpoint failed for any reason; the resolver adopts
    /// the maximally restrictive default rather than failing open.
    BaselineUnavailable,
    /// A resource call of the given kind succeeded.
    ResourceAllowed {
        /// The resource kind the outcome applies to
        kind: ResourceKind,
        /// Read or create
        mode: AccessMode,
    },
    /// A resource call of the given kind was refused with an
    /// authorization denial.
    ResourceDenied {
        /// The resource kind the outcome applies to
        kind: ResourceKind,
        /// Read or create
        mode: AccessMode,
    },
    /// The active branch changed (or was cleared).
    BranchChanged {
        /// The newly active branch, if any
        branch: Option<BranchId>,
    },
    /// The session ended; everything collapses back to deny-all.
    LoggedOut,
}

/// Reducer state: role, last baseline, and the implicit override map.
///
/// The snapshot is always a pure function of these three; `apply`
/// recomputes it after every event.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    role: Option<Role>,
    baseline: Option<CapabilityBaseline>,
    overrides: BTreeMap<CapabilityKey, bool>,
    snapshot: CapabilitySet,
}

impl PermissionResolver {
    /// A resolver for an anonymous session: deny-all until told otherwise.
    pub fn new() -> Self {
        Self {
            role: None,
            baseline: None,
            overrides: BTreeMap::new(),
            snapshot: CapabilitySet::deny_all(),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> &CapabilitySet {
        &self.snapshot
    }

    /// Reduce one event, returning the new snapshot.
    pub fn apply(&mut self, event: AccessEvent) -> CapabilitySet {
        match event {
            AccessEvent::LoggedIn { role } => {
                // Fresh identity: all prior signals belong to the old one.
                self.role = Some(role);
                self.baseline = None;
                self.overrides.clear();
            }
            AccessEvent::BaselineFetched { baseline } => {
                self.baseline = Some(baseline);
            }
            AccessEvent::BaselineUnavailable => {
                debug!("capability baseline unavailable, staying deny-by-default");
                self.baseline = None;
            }
            AccessEvent::ResourceAllowed { kind, mode } => {
                if let Some(key) = mode.capability(kind) {
                    self.overrides.insert(key, true);
                }
            }
            AccessEvent::ResourceDenied { kind, mode } => {
                if let Some(key) = mode.capability(kind) {
                    debug!(capability = %key, %kind, "capability downgraded by live denial");
                    self.overrides.insert(key, false);
                }
            }
            // Implicit overrides survive a branch change: the denial was
            // issued against the token, not the branch.
            AccessEvent::BranchChanged { .. } => {}
            AccessEvent::LoggedOut => {
                self.role = None;
                self.baseline = None;
                self.overrides.clear();
            }
        }

        self.snapshot = self.recompute();
        self.snapshot.clone()
    }

    /// Pure recomputation: role scope + baseline flags + overrides, in
    /// that order, with overrides winning.
    fn recompute(&self) -> CapabilitySet {
        let Some(role) = &self.role else {
            return CapabilitySet::deny_all();
        };

        let scope = BranchScope::from_role(role);
        let mut caps = match &self.baseline {
            Some(baseline) => CapabilitySet::from_baseline(baseline, scope),
            None => CapabilitySet {
                accessible_branches: scope,
                ..CapabilitySet::deny_all()
            },
        };

        for (key, value) in &self.overrides {
            caps = caps.with_flag(*key, *value);
        }
        caps
    }
}

impl Default for PermissionResolver {
    fn default() -> Self {
        Self::new()
    }
}
