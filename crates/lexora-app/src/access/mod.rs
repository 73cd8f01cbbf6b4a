//! # Access Module
//!
//! The permission side of the engine:
//!
//! - [`PermissionResolver`]: a reducer over [`AccessEvent`]s producing
//!   immutable [`CapabilitySet`](lexora_core::CapabilitySet) snapshots
//! - [`compose_navigation`]: pure derivation of the visible menu from the
//!   current role and snapshot

mod navigation;
mod resolver;

pub use navigation::{compose_navigation, NavSection};
pub use resolver::{AccessEvent, AccessMode, PermissionResolver};
