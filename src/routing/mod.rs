//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration:
//!     pattern string
//!     → pattern.rs (segments, canonical path, weight)
//!     → matcher.rs (typed variable segments)
//!     → table.rs (duplicate check, sort by weight)
//!
//! Lookup:
//!     raw path
//!     → table.rs (first match in weight order)
//!     → Return: matched route + params, or no match
//! ```
//!
//! # Design Decisions
//! - Deterministic: same table and input always match the same route
//! - First match wins (ordered by weight)
//! - No regex; segment-wise matching only

pub mod matcher;
pub mod pattern;
pub mod table;

pub use matcher::{Segment, VarKind};
pub use pattern::{Params, Pattern};
pub use table::{Availability, Handler, Navigation, RouteEntry, RouteTable, Special, SpecialHandlers};
