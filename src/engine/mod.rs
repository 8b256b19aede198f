//! Routing engine.
//!
//! # Data Flow
//! ```text
//! route(path) / check_hash() / listener
//!     → queue.rs (run now, or enqueue behind the active cycle)
//!     → router.rs cycle:
//!         route table lookup (weight order, first match)
//!         → availability predicate
//!         → state requirement (current, or transition permitted)
//!         → state_set when the route needs another state
//!         → handler | forbidden | not-found | failed
//!     → next queued path, until the queue is empty
//! ```
//!
//! # Design Decisions
//! - One cycle at a time; later requests queue, never interleave
//! - Route and special tables are swapped atomically (arc-swap), so a cycle
//!   works on a consistent snapshot while hooks register new routes
//! - Every cycle runs in its own tracing span with a fresh cycle id

pub mod queue;
pub mod router;
pub mod snapshot;

use serde::{Deserialize, Serialize};

pub use router::{FsmRouter, RouterBuilder};
pub use snapshot::{RouteView, RouterSnapshot, TransitionView};

/// What to do when a matched route needs no state change: either it has no
/// required state or the engine is already in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SameStatePolicy {
    /// Invoke the route's own handler.
    #[default]
    Handle,
    /// Dispatch to the failed (500) special handler.
    Fail,
}
