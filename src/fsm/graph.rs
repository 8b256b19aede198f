//! State and transition tables.
//!
//! # Responsibilities
//! - Own the set of states and their enter/leave hook lists
//! - Own the set of directed transitions and their before/after hook lists
//! - Hold the current-state pointer
//!
//! # Design Decisions
//! - Two flat tables: state id → record, (from, to) → record
//! - Every operation reports a `bool` outcome; nothing here can fail structurally
//! - Pure and synchronous; locking and hook execution live in `machine.rs`

use std::collections::HashMap;

use crate::hook::{self, Hook};

/// Arguments passed to enter and leave hooks.
///
/// Leave hooks see `from` = the state being left, `to` = the next state.
/// Enter hooks see `from` = the previous state, `to` = the state entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub from: String,
    pub to: String,
}

impl StateChange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Hook run when a state is entered or left.
pub type StateHook = Hook<StateChange, ()>;

/// Guard run before a transition; returning `false` vetoes it.
pub type BeforeHook = Hook<(), bool>;

/// Hook run after a transition has moved the current state.
pub type AfterHook = Hook<(), ()>;

/// Per-state hook lists.
#[derive(Debug, Default, Clone)]
pub struct StateRecord {
    pub on_enter: Vec<StateHook>,
    pub on_leave: Vec<StateHook>,
}

/// Per-transition hook lists.
#[derive(Debug, Default, Clone)]
pub struct TransitionRecord {
    pub on_before: Vec<BeforeHook>,
    pub on_after: Vec<AfterHook>,
}

/// The state graph with its current-state pointer.
#[derive(Debug)]
pub struct StateGraph {
    current: String,
    states: HashMap<String, StateRecord>,
    transitions: HashMap<(String, String), TransitionRecord>,
}

fn key(from: &str, to: &str) -> (String, String) {
    (from.to_string(), to.to_string())
}

impl StateGraph {
    /// Create a graph holding only `initial`, which is also the current state.
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        let mut states = HashMap::new();
        states.insert(initial.clone(), StateRecord::default());
        Self {
            current: initial,
            states,
            transitions: HashMap::new(),
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Move the pointer. Refuses targets that are not in the graph.
    pub(crate) fn set_current(&mut self, next: &str) -> bool {
        if !self.states.contains_key(next) {
            return false;
        }
        self.current = next.to_string();
        true
    }

    pub fn contains(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    pub fn state(&self, state: &str) -> Option<&StateRecord> {
        self.states.get(state)
    }

    pub fn transition(&self, from: &str, to: &str) -> Option<&TransitionRecord> {
        self.transitions.get(&key(from, to))
    }

    /// State ids, sorted.
    pub fn state_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.states.keys().cloned().collect();
        names.sort();
        names
    }

    /// Transition pairs, sorted.
    pub fn transition_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self.transitions.keys().cloned().collect();
        pairs.sort();
        pairs
    }

    pub fn add_state(&mut self, state: &str) -> bool {
        if self.states.contains_key(state) {
            return false;
        }
        self.states.insert(state.to_string(), StateRecord::default());
        true
    }

    /// Remove a state together with every transition touching it.
    ///
    /// The current state cannot be removed.
    pub fn del_state(&mut self, state: &str) -> bool {
        if state == self.current || self.states.remove(state).is_none() {
            return false;
        }
        self.transitions
            .retain(|(from, to), _| from != state && to != state);
        true
    }

    pub fn add_on_enter(&mut self, state: &str, hook: StateHook) -> bool {
        match self.states.get_mut(state) {
            Some(record) => hook::register(&mut record.on_enter, hook),
            None => false,
        }
    }

    pub fn del_on_enter(&mut self, state: &str, hook: &StateHook) -> bool {
        match self.states.get_mut(state) {
            Some(record) => hook::unregister(&mut record.on_enter, hook),
            None => false,
        }
    }

    pub fn add_on_leave(&mut self, state: &str, hook: StateHook) -> bool {
        match self.states.get_mut(state) {
            Some(record) => hook::register(&mut record.on_leave, hook),
            None => false,
        }
    }

    pub fn del_on_leave(&mut self, state: &str, hook: &StateHook) -> bool {
        match self.states.get_mut(state) {
            Some(record) => hook::unregister(&mut record.on_leave, hook),
            None => false,
        }
    }

    pub fn add_transition(&mut self, from: &str, to: &str) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        let k = key(from, to);
        if self.transitions.contains_key(&k) {
            return false;
        }
        self.transitions.insert(k, TransitionRecord::default());
        true
    }

    pub fn del_transition(&mut self, from: &str, to: &str) -> bool {
        self.transitions.remove(&key(from, to)).is_some()
    }

    fn transition_mut(&mut self, from: &str, to: &str) -> Option<&mut TransitionRecord> {
        self.transitions.get_mut(&key(from, to))
    }

    pub fn add_on_before(&mut self, from: &str, to: &str, hook: BeforeHook) -> bool {
        match self.transition_mut(from, to) {
            Some(record) => hook::register(&mut record.on_before, hook),
            None => false,
        }
    }

    pub fn del_on_before(&mut self, from: &str, to: &str, hook: &BeforeHook) -> bool {
        match self.transition_mut(from, to) {
            Some(record) => hook::unregister(&mut record.on_before, hook),
            None => false,
        }
    }

    pub fn add_on_after(&mut self, from: &str, to: &str, hook: AfterHook) -> bool {
        match self.transition_mut(from, to) {
            Some(record) => hook::register(&mut record.on_after, hook),
            None => false,
        }
    }

    pub fn del_on_after(&mut self, from: &str, to: &str, hook: &AfterHook) -> bool {
        match self.transition_mut(from, to) {
            Some(record) => hook::unregister(&mut record.on_after, hook),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> StateHook {
        Hook::sync(|_| ())
    }

    #[test]
    fn test_add_state_twice() {
        let mut graph = StateGraph::new("idle");
        assert!(graph.add_state("busy"));
        assert!(!graph.add_state("busy"));
        assert_eq!(graph.state_names(), vec!["busy", "idle"]);
    }

    #[test]
    fn test_del_state_prunes_both_directions() {
        let mut graph = StateGraph::new("a");
        graph.add_state("b");
        graph.add_state("c");
        assert!(graph.add_transition("a", "b"));
        assert!(graph.add_transition("b", "c"));
        assert!(graph.add_transition("c", "b"));
        assert!(graph.add_transition("a", "c"));

        assert!(graph.del_state("b"));
        assert!(!graph.del_state("b"));

        let pairs = graph.transition_pairs();
        assert_eq!(pairs, vec![("a".to_string(), "c".to_string())]);
        assert!(pairs.iter().all(|(f, t)| f != "b" && t != "b"));
    }

    #[test]
    fn test_current_state_cannot_be_deleted() {
        let mut graph = StateGraph::new("a");
        assert!(!graph.del_state("a"));
        assert!(graph.contains("a"));
    }

    #[test]
    fn test_transition_requires_both_endpoints() {
        let mut graph = StateGraph::new("a");
        assert!(!graph.add_transition("a", "missing"));
        graph.add_state("b");
        assert!(graph.add_transition("a", "b"));
        assert!(!graph.add_transition("a", "b"));
        assert!(graph.del_transition("a", "b"));
        assert!(!graph.del_transition("a", "b"));
    }

    #[test]
    fn test_state_hooks_require_state_and_identity() {
        let mut graph = StateGraph::new("a");
        let hook = noop();

        assert!(!graph.add_on_enter("missing", hook.clone()));
        assert!(graph.add_on_enter("a", hook.clone()));
        assert!(!graph.add_on_enter("a", hook.clone()));
        assert!(graph.add_on_leave("a", hook.clone()));

        assert!(!graph.del_on_enter("a", &noop()));
        assert!(graph.del_on_enter("a", &hook));
        assert!(!graph.del_on_enter("a", &hook));
        assert!(graph.del_on_leave("a", &hook));
    }

    #[test]
    fn test_transition_hooks_scoped_to_pair() {
        let mut graph = StateGraph::new("a");
        graph.add_state("b");
        let before: BeforeHook = Hook::sync(|_| true);
        let after: AfterHook = Hook::sync(|_| ());

        assert!(!graph.add_on_before("a", "b", before.clone()));
        graph.add_transition("a", "b");
        assert!(graph.add_on_before("a", "b", before.clone()));
        assert!(!graph.add_on_before("a", "b", before.clone()));
        assert!(graph.add_on_after("a", "b", after.clone()));
        assert!(!graph.add_on_after("b", "a", after.clone()));

        assert!(graph.del_on_before("a", "b", &before));
        assert!(graph.del_on_after("a", "b", &after));
        assert!(!graph.del_on_after("a", "b", &after));
    }

    #[test]
    fn test_set_current_refuses_unknown_state() {
        let mut graph = StateGraph::new("a");
        assert!(!graph.set_current("ghost"));
        assert_eq!(graph.current(), "a");
    }
}
