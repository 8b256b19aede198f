//! Transition executor.
//!
//! # Responsibilities
//! - Serialize state changes behind a single-flight flag
//! - Run before / leave / after / enter hooks in order, awaiting each
//! - Keep the current state unchanged when a transition is refused
//!
//! # Design Decisions
//! - A second `state_set` while one is in flight fails fast; it never queues
//! - The graph lock is never held across an await: hook lists are cloned
//!   before they run, so hooks may call back into the machine
//! - No rollback: a veto after earlier before-hooks ran leaves their effects

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::fsm::graph::{AfterHook, BeforeHook, StateChange, StateGraph, StateHook, StateRecord};

/// A state graph plus the machinery to move between its states.
#[derive(Debug)]
pub struct StateMachine {
    graph: Mutex<StateGraph>,
    in_transition: AtomicBool,
}

/// Holds the transition flag; releases it on drop, including on unwind.
struct TransitionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> TransitionGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl StateMachine {
    /// Create a machine whose only state, `initial`, is current.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            graph: Mutex::new(StateGraph::new(initial)),
            in_transition: AtomicBool::new(false),
        }
    }

    pub(crate) fn graph(&self) -> MutexGuard<'_, StateGraph> {
        self.graph.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state_get(&self) -> String {
        self.graph().current().to_string()
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.graph().contains(state)
    }

    pub fn in_transition(&self) -> bool {
        self.in_transition.load(Ordering::Acquire)
    }

    pub fn state_add(&self, state: &str) -> bool {
        let added = self.graph().add_state(state);
        if added {
            tracing::debug!(state, "State added");
        }
        added
    }

    pub fn state_del(&self, state: &str) -> bool {
        let removed = self.graph().del_state(state);
        if removed {
            tracing::debug!(state, "State removed");
        }
        removed
    }

    pub fn state_on_enter_add(&self, state: &str, hook: StateHook) -> bool {
        self.graph().add_on_enter(state, hook)
    }

    pub fn state_on_enter_del(&self, state: &str, hook: &StateHook) -> bool {
        self.graph().del_on_enter(state, hook)
    }

    pub fn state_on_leave_add(&self, state: &str, hook: StateHook) -> bool {
        self.graph().add_on_leave(state, hook)
    }

    pub fn state_on_leave_del(&self, state: &str, hook: &StateHook) -> bool {
        self.graph().del_on_leave(state, hook)
    }

    pub fn transition_add(&self, from: &str, to: &str) -> bool {
        let added = self.graph().add_transition(from, to);
        if added {
            tracing::debug!(from, to, "Transition added");
        }
        added
    }

    pub fn transition_del(&self, from: &str, to: &str) -> bool {
        self.graph().del_transition(from, to)
    }

    pub fn transition_on_before_add(&self, from: &str, to: &str, hook: BeforeHook) -> bool {
        self.graph().add_on_before(from, to, hook)
    }

    pub fn transition_on_before_del(&self, from: &str, to: &str, hook: &BeforeHook) -> bool {
        self.graph().del_on_before(from, to, hook)
    }

    pub fn transition_on_after_add(&self, from: &str, to: &str, hook: AfterHook) -> bool {
        self.graph().add_on_after(from, to, hook)
    }

    pub fn transition_on_after_del(&self, from: &str, to: &str, hook: &AfterHook) -> bool {
        self.graph().del_on_after(from, to, hook)
    }

    /// True if no transition is in flight and `current → next` is registered.
    pub fn check_transition(&self, next: &str) -> bool {
        if self.in_transition() {
            return false;
        }
        let graph = self.graph();
        graph.transition(graph.current(), next).is_some()
    }

    /// Move to `next`, running every hook of the transition in order.
    ///
    /// Returns `false` without side effects when another transition is in
    /// flight or `current → next` is not registered, and `false` with the
    /// current state untouched when a before-hook vetoes.
    pub async fn state_set(&self, next: &str) -> bool {
        let Some(_guard) = TransitionGuard::acquire(&self.in_transition) else {
            tracing::debug!(next, "Transition already in flight, rejecting");
            return false;
        };

        let (previous, before) = {
            let graph = self.graph();
            let Some(record) = graph.transition(graph.current(), next) else {
                tracing::debug!(from = %graph.current(), to = next, "No transition registered");
                return false;
            };
            (graph.current().to_string(), record.on_before.clone())
        };

        for hook in before {
            if !hook.call(()).await {
                tracing::info!(from = %previous, to = next, "Transition vetoed");
                return false;
            }
        }

        let leave = self.state_hooks(&previous, |record| &record.on_leave);
        for hook in leave {
            hook.call(StateChange::new(&previous, next)).await;
        }

        let after = {
            let mut graph = self.graph();
            if !graph.set_current(next) {
                tracing::warn!(from = %previous, to = next, "Target state removed during transition");
                return false;
            }
            graph
                .transition(&previous, next)
                .map(|record| record.on_after.clone())
                .unwrap_or_default()
        };
        tracing::info!(from = %previous, to = next, "State changed");

        for hook in after {
            hook.call(()).await;
        }

        let enter = self.state_hooks(next, |record| &record.on_enter);
        for hook in enter {
            hook.call(StateChange::new(&previous, next)).await;
        }

        true
    }

    fn state_hooks<F>(&self, state: &str, select: F) -> Vec<StateHook>
    where
        F: Fn(&StateRecord) -> &Vec<StateHook>,
    {
        self.graph()
            .state(state)
            .map(|record| select(record).clone())
            .unwrap_or_default()
    }
}
