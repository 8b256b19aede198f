//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in match order
//! - Reject equivalent (duplicate) routes
//! - Look up the first route matching a path
//!
//! # Design Decisions
//! - Sorted by descending weight; equal weights keep insertion order
//! - O(n) scan over routes (acceptable for typical route counts)
//! - Explicit no-match (`None`) rather than a silent default
//! - Cheap to clone: entries are shared, so the engine can swap whole tables

use std::sync::Arc;

use crate::error::RouterError;
use crate::hook::Hook;
use crate::routing::pattern::{Params, Pattern};

/// Arguments passed to handlers and availability predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    /// Canonical path of the matched route, or empty when none matched.
    pub route: String,
    /// Raw path that was navigated to.
    pub path: String,
    /// Captured variables.
    pub params: Params,
}

/// Route or special handler.
pub type Handler = Hook<Navigation, ()>;

/// Availability predicate; the route is available iff it yields `true`.
pub type Availability = Hook<Navigation, bool>;

/// A registered route.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: Pattern,
    /// Required state; `None` accepts any state.
    pub state: Option<String>,
    pub handler: Handler,
    pub available: Option<Availability>,
    pub forbidden: Option<Handler>,
}

impl RouteEntry {
    pub fn new(pattern: Pattern, state: Option<String>, handler: Handler) -> Self {
        Self {
            pattern,
            state,
            handler,
            available: None,
            forbidden: None,
        }
    }
}

/// Ordered set of routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<RouteEntry>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in match order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteEntry>> {
        self.routes.iter()
    }

    /// Insert unless an equivalent route exists.
    pub fn insert(&mut self, entry: RouteEntry) -> bool {
        if self.contains(&entry.pattern) {
            return false;
        }
        self.routes.push(Arc::new(entry));
        // stable: equal weights stay in insertion order
        self.routes
            .sort_by(|a, b| b.pattern.weight().cmp(&a.pattern.weight()));
        true
    }

    /// Remove the first route equivalent to `pattern`.
    pub fn remove(&mut self, pattern: &Pattern) -> bool {
        match self
            .routes
            .iter()
            .position(|route| route.pattern.equivalent(pattern))
        {
            Some(index) => {
                self.routes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, pattern: &Pattern) -> bool {
        self.routes
            .iter()
            .any(|route| route.pattern.equivalent(pattern))
    }

    /// First route (highest weight) matching `path`.
    pub fn find(&self, path: &str) -> Option<(Arc<RouteEntry>, Params)> {
        self.routes.iter().find_map(|route| {
            route
                .pattern
                .capture(path)
                .map(|params| (route.clone(), params))
        })
    }
}

/// Engine-wide fallback handler slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    /// 403: a route matched but may not be used now.
    Forbidden,
    /// 404: nothing matched.
    NotFound,
    /// 500: a required transition failed.
    Failed,
}

impl Special {
    pub fn code(self) -> u16 {
        match self {
            Special::Forbidden => 403,
            Special::NotFound => 404,
            Special::Failed => 500,
        }
    }
}

impl TryFrom<u16> for Special {
    type Error = RouterError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            403 => Ok(Special::Forbidden),
            404 => Ok(Special::NotFound),
            500 => Ok(Special::Failed),
            other => Err(RouterError::InvalidSpecialCode(other)),
        }
    }
}

/// The three special handler slots.
#[derive(Debug, Clone, Default)]
pub struct SpecialHandlers {
    pub forbidden: Option<Handler>,
    pub not_found: Option<Handler>,
    pub failed: Option<Handler>,
}

impl SpecialHandlers {
    pub fn set(&mut self, special: Special, handler: Handler) {
        let slot = match special {
            Special::Forbidden => &mut self.forbidden,
            Special::NotFound => &mut self.not_found,
            Special::Failed => &mut self.failed,
        };
        *slot = Some(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pattern: &str) -> RouteEntry {
        RouteEntry::new(Pattern::parse(pattern).unwrap(), None, Hook::sync(|_| ()))
    }

    fn order(table: &RouteTable) -> Vec<String> {
        table
            .iter()
            .map(|route| route.pattern.canonical().to_string())
            .collect()
    }

    #[test]
    fn test_sorted_by_weight_with_stable_ties() {
        let mut table = RouteTable::new();
        assert!(table.insert(entry(":a/:b")));
        assert!(table.insert(entry("x/:b")));
        assert!(table.insert(entry(":a/y")));
        assert!(table.insert(entry(":a/z")));

        assert_eq!(
            order(&table),
            vec!["x/:b[AZ09]", ":a[AZ09]/y", ":a[AZ09]/z", ":a[AZ09]/:b[AZ09]"]
        );
    }

    #[test]
    fn test_equivalent_route_rejected() {
        let mut table = RouteTable::new();
        assert!(table.insert(entry("/a/:x[09]")));
        assert!(!table.insert(entry("/a/:x")));
        assert!(table.insert(entry("/a/:x[AZ]/b")));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_heaviest_match_wins() {
        let mut table = RouteTable::new();
        table.insert(entry("users/:id/:tab"));
        table.insert(entry("users/:id/edit"));

        let (route, params) = table.find("users/7/edit").unwrap();
        assert_eq!(route.pattern.weight(), 5);
        assert_eq!(params.get("id").map(String::as_str), Some("7"));

        let (route, _) = table.find("users/7/view").unwrap();
        assert_eq!(route.pattern.weight(), 4);

        assert!(table.find("groups/7").is_none());
    }

    #[test]
    fn test_remove_equivalent() {
        let mut table = RouteTable::new();
        table.insert(entry("a/:x[09]"));
        assert!(table.remove(&Pattern::parse("a/:y").unwrap()));
        assert!(!table.remove(&Pattern::parse("a/:y").unwrap()));
        assert!(table.is_empty());
    }

    #[test]
    fn test_special_codes() {
        assert_eq!(Special::try_from(403).unwrap(), Special::Forbidden);
        assert_eq!(Special::try_from(404).unwrap().code(), 404);
        assert!(matches!(
            Special::try_from(418),
            Err(RouterError::InvalidSpecialCode(418))
        ));
    }
}
