//! Lexora App - Portable Headless Engine
//!
//! The access-control and branch-scoping engine behind the Lexora
//! law-office UI. Frontends hold an [`AppCore`], dispatch user actions
//! through it, and render from [`StateSnapshot`]; the engine decides which
//! branch's records are visible, whether financial data may be seen, and
//! which management actions are permitted, and keeps those decisions
//! honest against live backend responses.
//!
//! # Components
//!
//! - [`session`]: session manager (token/user custody, atomic reset) and
//!   branch context (active-branch resolution and selection)
//! - [`access`]: permission resolver (event reducer over capability
//!   signals) and navigation composer
//! - [`fetch`]: access-gated data fetcher (branch tagging, stale-response
//!   guard, error policy, collection cache)
//! - [`core`]: the [`AppCore`] facade and its state machine
//!
//! Upstream feeds downstream: identity feeds the branch context, the
//! branch feeds the resolver, the resolver feeds the fetcher and the
//! navigation. A change anywhere upstream invalidates everything below it.

#![forbid(unsafe_code)]

/// Permission resolver and navigation composer
pub mod access;

/// AppCore facade, session state machine, state snapshot
pub mod core;

/// Engine errors and user-facing notices
pub mod errors;

/// Access-gated data fetcher and collection cache
pub mod fetch;

/// Session manager and branch context
pub mod session;

pub use crate::core::{AppCore, SessionPhase, StateSnapshot};
pub use access::{compose_navigation, AccessEvent, AccessMode, NavSection, PermissionResolver};
pub use errors::{AppError, Notice, NoticeLevel};
pub use fetch::{CollectionCache, FetchResolution, FetchTicket};
pub use session::{resolve_active_branch, SessionManager};
