//! Branch-scoped resource kinds
//!
//! The closed set of collections that carry a branch id on every request.
//! Record schemas and validation live outside this engine; records flow
//! through as opaque JSON payloads keyed by kind.

use crate::capability::CapabilityKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A branch-scoped collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Client records
    Clients,
    /// Case files
    Cases,
    /// Contracts
    Contracts,
    /// Financial entries (invoices, payments)
    FinancialRecords,
    /// Tasks
    Tasks,
    /// Staff roster
    Staff,
}

impl ResourceKind {
    /// All branch-scoped kinds, in the order the initial load fans out and
    /// the navigation lists them.
    pub const ALL: [Self; 6] = [
        Self::Clients,
        Self::Cases,
        Self::Contracts,
        Self::FinancialRecords,
        Self::Tasks,
        Self::Staff,
    ];

    /// The capability a *read* authorization outcome on this kind speaks
    /// for, if the mapping is unambiguous.
    ///
    /// Only financial records have one: a 403 on the financial list means
    /// the financial flag is wrong, full stop. A 403 on any other kind is
    /// isolated to that collection without touching the capability set.
    pub fn read_capability(&self) -> Option<CapabilityKey> {
        match self {
            Self::FinancialRecords => Some(CapabilityKey::FinancialData),
            _ => None,
        }
    }

    /// The capability a *create* authorization outcome on this kind speaks
    /// for, if any.
    pub fn create_capability(&self) -> Option<CapabilityKey> {
        match self {
            Self::FinancialRecords => Some(CapabilityKey::FinancialData),
            Self::Tasks => Some(CapabilityKey::CreateTasks),
            Self::Staff => Some(CapabilityKey::ManageUsers),
            _ => None,
        }
    }

    /// Whether records of this kind are financial data, and so must be
    /// purged from caches whenever the financial capability is revoked.
    pub fn is_financial(&self) -> bool {
        matches!(self, Self::FinancialRecords)
    }

    /// Stable path segment used in request routing and logging.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Cases => "cases",
            Self::Contracts => "contracts",
            Self::FinancialRecords => "financial-records",
            Self::Tasks => "tasks",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
