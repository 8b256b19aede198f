//! Serializable view of a router, for logging and the CLI `describe` command.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionView {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteView {
    /// Canonical path.
    pub path: String,
    pub weight: u64,
    /// Required state; absent means any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Point-in-time view of a router. Routes are listed in match order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterSnapshot {
    pub current_state: String,
    pub states: Vec<String>,
    pub transitions: Vec<TransitionView>,
    pub routes: Vec<RouteView>,
    /// Codes of the installed special handlers.
    pub specials: Vec<u16>,
}
