//! In-process navigation fragment.

use tokio::sync::watch;

use crate::error::RouterResult;
use crate::navigation::{publish, NavigationSource};

/// A fragment held in memory. Used for embedding and in tests.
#[derive(Debug)]
pub struct MemoryLocation {
    tx: watch::Sender<String>,
}

impl MemoryLocation {
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(initial.into());
        Self { tx }
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("")
    }
}

impl NavigationSource for MemoryLocation {
    fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    fn set(&self, fragment: &str) -> RouterResult<()> {
        publish(&self.tx, fragment);
        Ok(())
    }

    fn subscribe(&self) -> RouterResult<watch::Receiver<String>> {
        Ok(self.tx.subscribe())
    }
}
