//! Routing flag and pending-path queue.
//!
//! The flag and the queue share one lock so that "is a cycle running?" and
//! "enqueue" happen atomically: a path is either queued behind a running
//! cycle or starts one, never both and never neither.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct QueueState {
    routing: bool,
    pending: VecDeque<String>,
}

/// Outcome of offering a path to the queue.
#[derive(Debug, PartialEq, Eq)]
pub enum Admission {
    /// No cycle was running; the caller now owns one and must run this path.
    Run(String),
    /// A cycle is running; the path waits at this queue depth.
    Queued(usize),
}

#[derive(Debug, Default)]
pub struct DispatchQueue {
    state: Mutex<QueueState>,
}

impl DispatchQueue {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn admit(&self, path: String) -> Admission {
        let mut state = self.lock();
        if state.routing {
            state.pending.push_back(path);
            return Admission::Queued(state.pending.len());
        }
        state.routing = true;
        // leftovers from an aborted cycle keep their place ahead of `path`
        match state.pending.pop_front() {
            Some(first) => {
                state.pending.push_back(path);
                Admission::Run(first)
            }
            None => Admission::Run(path),
        }
    }

    /// Next pending path, or `None` after clearing the routing flag.
    pub fn next(&self) -> Option<String> {
        let mut state = self.lock();
        let next = state.pending.pop_front();
        if next.is_none() {
            state.routing = false;
        }
        next
    }

    pub fn is_routing(&self) -> bool {
        self.lock().routing
    }

    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    fn abort(&self) {
        self.lock().routing = false;
    }
}

/// Clears the routing flag if a cycle unwinds before draining the queue.
pub struct CycleGuard<'a> {
    queue: &'a DispatchQueue,
    armed: bool,
}

impl<'a> CycleGuard<'a> {
    pub fn new(queue: &'a DispatchQueue) -> Self {
        Self { queue, armed: true }
    }

    /// The queue drained normally and already cleared the flag.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(pending = self.queue.pending(), "Routing cycle aborted");
            self.queue.abort();
        }
    }
}
