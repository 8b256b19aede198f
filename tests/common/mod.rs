//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use fsm_router::{Handler, Hook, Navigation};
use tokio::sync::Notify;

/// Collects one line per handler invocation.
#[derive(Clone, Default)]
pub struct Recorder {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: impl Into<String>) {
        self.lines.lock().unwrap().push(line.into());
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Handler recording `label path`.
    pub fn handler(&self, label: &'static str) -> Handler {
        let recorder = self.clone();
        Hook::sync(move |nav: Navigation| recorder.push(format!("{label} {}", nav.path)))
    }

    /// Wait until at least `count` lines were recorded.
    pub async fn wait_for(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.lines.lock().unwrap().len() < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("timed out waiting for handlers");
    }
}

/// Lets a test hold a handler mid-flight.
#[derive(Clone, Default)]
pub struct Gate {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler that records `label path`, signals `started`, then waits for `release`.
    pub fn handler(&self, recorder: &Recorder, label: &'static str) -> Handler {
        let gate = self.clone();
        let recorder = recorder.clone();
        Hook::new(move |nav: Navigation| {
            let gate = gate.clone();
            let recorder = recorder.clone();
            async move {
                recorder.push(format!("{label} {}", nav.path));
                gate.started.notify_one();
                gate.release.notified().await;
            }
        })
    }
}
