//! # Core Application Module
//!
//! - [`AppCore`]: the engine facade frontends hold
//! - [`SessionPhase`]: the session state machine position
//! - [`StateSnapshot`]: FFI-safe read model for rendering

mod app;
mod snapshot;

pub use app::AppCore;
pub use snapshot::{SessionPhase, StateSnapshot};
