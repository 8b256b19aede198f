//! Finite state machine subsystem.
//!
//! # Data Flow
//! ```text
//! state_set(next)
//!     → machine.rs (single-flight flag, hook snapshot)
//!     → graph.rs (transition lookup, pointer update)
//!     → before* → leave* → current = next → after* → enter*
//! ```
//!
//! # Design Decisions
//! - States and transitions are explicit tables, not nested maps
//! - Missing states/transitions are `false` outcomes, never errors
//! - The current state always names a state in the graph

pub mod graph;
pub mod machine;

pub use graph::{AfterHook, BeforeHook, StateChange, StateGraph, StateHook};
pub use machine::StateMachine;
