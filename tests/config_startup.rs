//! Router definitions loaded from TOML and bound at startup.

use std::io::Write;

use fsm_router::config::{load_config, parse_config, ConfigError, RouteConfig, ValidationError};
use fsm_router::lifecycle::{build_router, HandlerFactory};
use fsm_router::{Handler, SameStatePolicy, Special};

mod common;

use common::Recorder;

const DEFINITION: &str = r#"
initial_state = "guest"
same_state_policy = "fail"
states = ["member"]
specials = [403, 404, 500]

[logging]
level = "debug"
json = true

[[transitions]]
from = "guest"
to = "member"

[[routes]]
name = "home"
path = "home"

[[routes]]
name = "profile"
state = "member"
path = "users/:id[09]"
"#;

struct Recording(Recorder);

impl HandlerFactory for Recording {
    fn route_handler(&self, route: &RouteConfig) -> Handler {
        let label: &'static str = match route.name.as_str() {
            "home" => "home",
            "profile" => "profile",
            _ => "other",
        };
        self.0.handler(label)
    }

    fn special_handler(&self, special: Special) -> Handler {
        self.0.handler(match special {
            Special::Forbidden => "403",
            Special::NotFound => "404",
            Special::Failed => "500",
        })
    }
}

#[test]
fn test_parse_full_definition() {
    let config = parse_config(DEFINITION).unwrap();
    assert_eq!(config.initial_state, "guest");
    assert_eq!(config.same_state_policy, SameStatePolicy::Fail);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert_eq!(config.routes[1].state.as_deref(), Some("member"));
}

#[test]
fn test_invalid_definition_reports_every_problem() {
    let err = parse_config(
        r#"
        [[transitions]]
        from = "init"
        to = "nowhere"

        [[routes]]
        name = "bad"
        path = "a/:x[ZZ]"
        "#,
    )
    .unwrap_err();

    let errors = match err {
        ConfigError::Validation(errors) => errors,
        other => panic!("expected validation errors, got {other}"),
    };
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], ValidationError::TransitionUnknownState { .. }));
    assert!(matches!(errors[1], ValidationError::InvalidPath { .. }));
}

#[tokio::test]
async fn test_loaded_definition_routes() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DEFINITION.as_bytes()).unwrap();
    let config = load_config(file.path()).unwrap();

    let recorder = Recorder::new();
    let router = build_router(&config, None, &Recording(recorder.clone())).unwrap();

    router.route("users/12").await;
    router.route("users/ab").await;
    // same-state policy is `fail`
    router.route("users/13").await;
    router.route("home").await;

    assert_eq!(
        recorder.lines(),
        vec!["profile users/12", "404 users/ab", "500 users/13", "500 home"]
    );
    assert_eq!(router.state_get(), "member");
}
