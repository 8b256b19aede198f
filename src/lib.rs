//! Hash-fragment router driven by a finite state machine.
//!
//! Routes are path patterns bound to an optional required state. Navigating
//! to a path picks the heaviest matching route, moves the state machine into
//! the route's state if the transition is allowed, and dispatches the route's
//! handler, or one of the 403/404/500 special handlers when it cannot.

pub mod config;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod hook;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use engine::{FsmRouter, RouterBuilder, RouterSnapshot, SameStatePolicy};
pub use error::{RouterError, RouterResult};
pub use fsm::StateChange;
pub use hook::Hook;
pub use navigation::{FileLocation, MemoryLocation, NavigationSource};
pub use routing::{Availability, Handler, Navigation, Params, Special};
