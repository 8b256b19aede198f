//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Register states, transitions, routes → Listen
//!
//! Signals (signals.rs):
//!     SIGINT → resolve the listener's shutdown future
//! ```
//!
//! # Design Decisions
//! - Ordered startup: graph first, then routes
//! - Shutdown is a plain future, so tests can drive it without signals

pub mod signals;
pub mod startup;

pub use startup::{build_router, HandlerFactory};
