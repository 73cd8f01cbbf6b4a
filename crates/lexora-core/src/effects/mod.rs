//! Effect trait definitions
//!
//! Pure interfaces with no implementations. The engine in `lexora-app`
//! depends only on these seams; production transports and stores live in
//! the host application, test doubles in `lexora-testkit`.

pub mod api;
pub mod store;

pub use api::{DirectoryApi, LoginError, RecordPayload};
pub use store::{PersistedSession, SessionStore, StoreError};
