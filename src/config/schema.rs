//! Configuration schema definitions.
//!
//! This module defines a declarative router definition: states, transitions,
//! routes and special handlers. All types derive Serde traits for
//! deserialization from TOML files.
//!
//! ```toml
//! initial_state = "guest"
//! states = ["guest", "member"]
//! specials = [403, 404, 500]
//!
//! [[transitions]]
//! from = "guest"
//! to = "member"
//!
//! [[routes]]
//! name = "profile"
//! state = "member"
//! path = "users/:id[09]"
//! ```

use serde::{Deserialize, Serialize};

use crate::engine::SameStatePolicy;

/// Root router definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// State the engine starts in. Added to the graph implicitly.
    pub initial_state: String,

    /// Dispatch policy for routes that need no state change.
    pub same_state_policy: SameStatePolicy,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Additional states.
    pub states: Vec<String>,

    /// Allowed transitions.
    pub transitions: Vec<TransitionConfig>,

    /// Route definitions.
    pub routes: Vec<RouteConfig>,

    /// Special handler codes to install (403, 404, 500).
    pub specials: Vec<u16>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            initial_state: "init".to_string(),
            same_state_policy: SameStatePolicy::default(),
            logging: LoggingConfig::default(),
            states: Vec::new(),
            transitions: Vec::new(),
            routes: Vec::new(),
            specials: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this crate when `RUST_LOG` is unset.
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// A directed transition between two declared states.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransitionConfig {
    pub from: String,
    pub to: String,
}

/// A route bound to an optional required state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging and handler binding.
    pub name: String,

    /// Required state; omitted means any state.
    #[serde(default)]
    pub state: Option<String>,

    /// Path pattern, e.g. `users/:id[09]/edit`.
    pub path: String,
}
