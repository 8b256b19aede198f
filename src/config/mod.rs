//! Router definition subsystem.
//!
//! # Data Flow
//! ```text
//! router.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → lifecycle::startup::build_router
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Handlers are code, so the file only names routes; binding happens at startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{LoggingConfig, RouteConfig, RouterConfig, TransitionConfig};
pub use validation::{validate_config, ValidationError};
