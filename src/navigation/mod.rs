//! Navigation boundary.
//!
//! # Data Flow
//! ```text
//! host changes the fragment (`#users/7`)
//!     → NavigationSource::subscribe (watch channel fires)
//!     → engine listener strips `#`, enqueues or starts a routing cycle
//!
//! engine trigger(path)
//!     → NavigationSource::current / set (`#path`, only when different)
//! ```
//!
//! # Design Decisions
//! - The engine never touches process-wide state; the source is injected
//! - Fragments are stored raw, leading `#` included
//! - A watch channel carries changes: only the latest value is kept

pub mod file;
pub mod memory;

use tokio::sync::watch;

use crate::error::RouterResult;

pub use file::FileLocation;
pub use memory::MemoryLocation;

/// Where the navigation fragment lives.
pub trait NavigationSource: Send + Sync + 'static {
    /// Current raw fragment (e.g. `#users/7`), or an empty string.
    fn current(&self) -> String;

    /// Replace the fragment.
    fn set(&self, fragment: &str) -> RouterResult<()>;

    /// Receive every subsequent fragment change.
    fn subscribe(&self) -> RouterResult<watch::Receiver<String>>;
}

/// Update a watch channel only when the value actually changes.
pub(crate) fn publish(tx: &watch::Sender<String>, fragment: &str) -> bool {
    tx.send_if_modified(|value| {
        if value == fragment {
            return false;
        }
        *value = fragment.to_string();
        true
    })
}
