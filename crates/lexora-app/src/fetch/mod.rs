//! # Access-Gated Data Fetcher
//!
//! Every branch-scoped collection fetch is tagged at dispatch with the
//! branch and session generation active at that moment. When the response
//! arrives the tag is compared against the live values: a mismatch means
//! the session moved on (branch switch or logout) while the request was
//! in flight, and the result is silently dropped. Staleness is handled by
//! this tag-and-compare, never by cancelling transports.
//!
//! The dispatch/complete split lives on
//! [`AppCore`](crate::core::AppCore): `begin_fetch` issues a
//! [`FetchTicket`], `complete_fetch` applies a result through the guard
//! and the error policy. This module holds the ticket, the outcome type,
//! and the [`CollectionCache`].

mod cache;

pub use cache::CollectionCache;

use crate::errors::Notice;
use lexora_core::{BranchId, ResourceKind, SessionGeneration};

/// Dispatch-time tag for one branch-scoped collection fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    /// The collection being fetched
    pub kind: ResourceKind,
    /// The branch the request was scoped to
    pub branch: BranchId,
    /// The session generation at dispatch
    pub generation: SessionGeneration,
}

/// What happened when a fetch result was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResolution {
    /// The result was current and the collection was replaced.
    Applied {
        /// The collection that was updated
        kind: ResourceKind,
        /// Number of records applied
        count: usize,
    },
    /// The tag no longer matched the live session; the result was
    /// silently dropped.
    Stale {
        /// The collection the dropped result belonged to
        kind: ResourceKind,
    },
    /// The backend denied this resource; the matching capability was
    /// downgraded locally and that kind's cache purged. Other resources
    /// are unaffected.
    Downgraded {
        /// The denied collection
        kind: ResourceKind,
        /// The single notification for the user
        notice: Notice,
    },
    /// The token expired; the whole session was force-closed.
    SessionExpired {
        /// The single notification for the user
        notice: Notice,
    },
    /// A non-fatal failure; prior state was kept.
    Failed {
        /// The collection the failure belonged to
        kind: ResourceKind,
        /// The single notification for the user
        notice: Notice,
    },
}

impl FetchResolution {
    /// The notice to surface, if this resolution carries one.
    ///
    /// `Applied` and `Stale` are silent.
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Self::Applied { .. } | Self::Stale { .. } => None,
            Self::Downgraded { notice, .. }
            | Self::SessionExpired { notice }
            | Self::Failed { notice, .. } => Some(notice),
        }
    }

    /// Whether the result mutated local state.
    pub fn applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}
