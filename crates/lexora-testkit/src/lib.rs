//! Lexora Testing Infrastructure
//!
//! Scripted in-memory doubles for the two effect seams, plus fixtures for
//! users, branches, and capability baselines. The doubles are deterministic:
//! every backend outcome a test needs (a denial on one collection, an
//! expired token halfway through a refresh, a corrupt persisted session)
//! is scripted up front rather than simulated with timing.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lexora_testkit::*;
//!
//! let directory = ScriptedDirectory::new();
//! let user = directory.register_super_admin("root@lexora.example");
//! let store = MemoryStore::new();
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod directory;
pub mod fixtures;
pub mod store;

pub use directory::ScriptedDirectory;
pub use fixtures::*;
pub use store::MemoryStore;

// Re-export commonly used external types for convenience
pub use lexora_core::effects::{DirectoryApi, PersistedSession, RecordPayload, SessionStore};
pub use lexora_core::{
    ApiError, Branch, BranchId, CapabilityBaseline, Credentials, ResourceKind, Role, User, UserId,
};

/// Initialize a fmt subscriber for test visibility.
///
/// Safe to call from every test; only the first call installs it. Honors
/// `RUST_LOG` via the default env filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
