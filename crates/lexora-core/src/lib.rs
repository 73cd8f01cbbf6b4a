//! Lexora Core - Domain Foundation
//!
//! This crate provides the domain types and effect interfaces shared by the
//! Lexora access-control and branch-scoping engine. It contains only data
//! definitions, pure derivations, and trait seams with no I/O of its own.
//!
//! # Layers
//!
//! ## Domain Types
//! - [`Role`]: tagged union of `SuperAdmin | BranchAdmin | Lawyer`
//! - [`User`], [`Branch`]: directory records fetched at login
//! - [`CapabilitySet`]: the derived permission snapshot (deny-all default)
//! - [`ResourceKind`]: the closed set of branch-scoped collections
//!
//! ## Effect Interfaces (Pure Signatures)
//! - [`effects::DirectoryApi`]: login, capability baseline, branch list,
//!   per-resource CRUD
//! - [`effects::SessionStore`]: the three persisted local-state keys
//!
//! ## Error Taxonomy
//! - [`ApiError`]: the closed classification every backend response maps
//!   into, which drives the engine's recovery policy

#![forbid(unsafe_code)]

/// User, branch, and generation identifiers
pub mod identifiers;

/// Role tagged union and branch-scope derivation
pub mod role;

/// Directory records: users, branches, credentials
pub mod directory;

/// Capability set, baseline payload, and capability keys
pub mod capability;

/// Branch-scoped resource kinds
pub mod resource;

/// Backend error taxonomy and response classification
pub mod errors;

/// Pure effect interfaces (no implementations)
pub mod effects;

pub use capability::{CapabilityBaseline, CapabilityKey, CapabilitySet};
pub use directory::{Branch, Credentials, LoginSuccess, User};
pub use errors::{ApiError, FieldError};
pub use identifiers::{BranchId, SessionGeneration, UserId};
pub use resource::ResourceKind;
pub use role::Role;
