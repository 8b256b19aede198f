//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! engine / fsm / navigation produce:
//!     → tracing events (state changes, dispatch decisions)
//!     → `routing_cycle` spans carrying a per-cycle UUID
//!
//! logging.rs installs the subscriber that renders them.
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Cycle ID flows through every event of one dispatch

pub mod logging;
