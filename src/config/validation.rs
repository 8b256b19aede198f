//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (transitions and routes name declared states)
//! - Compile every pattern and detect equivalent routes
//! - Reject unknown special codes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before the definition is turned into a router

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::{Pattern, Special};

/// A single semantic problem in a router definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("initial_state must not be empty")]
    EmptyInitialState,

    #[error("state `{0}` declared more than once")]
    DuplicateState(String),

    #[error("transition {from} -> {to} references unknown state `{state}`")]
    TransitionUnknownState {
        from: String,
        to: String,
        state: String,
    },

    #[error("transition {from} -> {to} declared more than once")]
    DuplicateTransition { from: String, to: String },

    #[error("route `{route}` requires unknown state `{state}`")]
    RouteUnknownState { route: String, state: String },

    #[error("route `{route}` has an invalid path: {reason}")]
    InvalidPath { route: String, reason: String },

    #[error("route `{route}` is equivalent to route `{existing}`")]
    DuplicateRoute { route: String, existing: String },

    #[error("invalid special code {0} (expected 403, 404 or 500)")]
    InvalidSpecial(u16),
}

/// Check a definition, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.initial_state.is_empty() {
        errors.push(ValidationError::EmptyInitialState);
    }

    let mut states: HashSet<&str> = HashSet::new();
    states.insert(config.initial_state.as_str());
    let mut declared: HashSet<&str> = HashSet::new();
    for state in &config.states {
        if !declared.insert(state.as_str()) {
            errors.push(ValidationError::DuplicateState(state.clone()));
        }
        states.insert(state.as_str());
    }

    let mut pairs = HashSet::new();
    for transition in &config.transitions {
        for endpoint in [&transition.from, &transition.to] {
            if !states.contains(endpoint.as_str()) {
                errors.push(ValidationError::TransitionUnknownState {
                    from: transition.from.clone(),
                    to: transition.to.clone(),
                    state: endpoint.clone(),
                });
            }
        }
        if !pairs.insert((transition.from.as_str(), transition.to.as_str())) {
            errors.push(ValidationError::DuplicateTransition {
                from: transition.from.clone(),
                to: transition.to.clone(),
            });
        }
    }

    let mut compiled: Vec<(&str, Pattern)> = Vec::new();
    for route in &config.routes {
        if let Some(state) = &route.state {
            if !states.contains(state.as_str()) {
                errors.push(ValidationError::RouteUnknownState {
                    route: route.name.clone(),
                    state: state.clone(),
                });
            }
        }
        match Pattern::parse(&route.path) {
            Ok(pattern) => {
                if let Some((existing, _)) = compiled.iter().find(|(_, p)| p.equivalent(&pattern)) {
                    errors.push(ValidationError::DuplicateRoute {
                        route: route.name.clone(),
                        existing: existing.to_string(),
                    });
                } else {
                    compiled.push((route.name.as_str(), pattern));
                }
            }
            Err(e) => errors.push(ValidationError::InvalidPath {
                route: route.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    for &code in &config.specials {
        if Special::try_from(code).is_err() {
            errors.push(ValidationError::InvalidSpecial(code));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
