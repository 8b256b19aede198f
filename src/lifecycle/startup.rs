//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated [`RouterConfig`] into a live [`FsmRouter`]
//! - Bind route names and special codes to handlers
//!
//! # Design Decisions
//! - Fail fast: the first registration error aborts startup
//! - States first, then transitions, then routes (routes reference states)
//! - Handlers come from a factory; the definition file only names them

use std::sync::Arc;

use crate::config::{RouteConfig, RouterConfig};
use crate::engine::FsmRouter;
use crate::error::RouterResult;
use crate::navigation::NavigationSource;
use crate::routing::{Handler, Special};

/// Supplies handlers for the routes and special codes a definition names.
pub trait HandlerFactory {
    fn route_handler(&self, route: &RouteConfig) -> Handler;

    fn special_handler(&self, special: Special) -> Handler;
}

/// Build a router from `config`, reading navigation from `source` if given.
pub fn build_router(
    config: &RouterConfig,
    source: Option<Arc<dyn NavigationSource>>,
    factory: &dyn HandlerFactory,
) -> RouterResult<FsmRouter> {
    let mut builder =
        FsmRouter::builder(config.initial_state.clone()).same_state_policy(config.same_state_policy);
    if let Some(source) = source {
        builder = builder.source(source);
    }
    let router = builder.build();

    for state in &config.states {
        router.state_add(state);
    }
    for transition in &config.transitions {
        router.transition_add(&transition.from, &transition.to);
    }
    for route in &config.routes {
        let handler = factory.route_handler(route);
        if !router.route_add(route.state.as_deref(), &route.path, handler)? {
            tracing::warn!(route = %route.name, "Equivalent route already registered, skipped");
        }
    }
    for &code in &config.specials {
        let special = Special::try_from(code)?;
        router.route_special_add(code, factory.special_handler(special))?;
    }

    tracing::info!(
        initial_state = %config.initial_state,
        states = config.states.len(),
        transitions = config.transitions.len(),
        routes = config.routes.len(),
        "Router built"
    );
    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::error::RouterError;
    use crate::hook::Hook;

    struct Silent;

    impl HandlerFactory for Silent {
        fn route_handler(&self, _route: &RouteConfig) -> Handler {
            Hook::sync(|_| ())
        }

        fn special_handler(&self, _special: Special) -> Handler {
            Hook::sync(|_| ())
        }
    }

    #[test]
    fn test_build_registers_everything() {
        let config = parse_config(
            r#"
            initial_state = "guest"
            states = ["member"]
            specials = [404, 500]

            [[transitions]]
            from = "guest"
            to = "member"

            [[routes]]
            name = "profile"
            state = "member"
            path = "/users/:id[09]/edit"
            "#,
        )
        .unwrap();

        let router = build_router(&config, None, &Silent).unwrap();
        let snapshot = router.snapshot();
        assert_eq!(snapshot.current_state, "guest");
        assert_eq!(snapshot.states, vec!["guest", "member"]);
        assert_eq!(snapshot.transitions.len(), 1);
        assert_eq!(snapshot.routes[0].path, "users/:id[09]/edit");
        assert_eq!(snapshot.routes[0].weight, 5);
        assert_eq!(snapshot.specials, vec![404, 500]);
    }

    #[test]
    fn test_unvalidated_config_fails_fast() {
        let config = RouterConfig {
            routes: vec![RouteConfig {
                name: "x".into(),
                state: Some("ghost".into()),
                path: "x".into(),
            }],
            ..RouterConfig::default()
        };
        assert!(matches!(
            build_router(&config, None, &Silent),
            Err(RouterError::UnknownState(s)) if s == "ghost"
        ));
    }
}
