//! # Scholaris Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`database`]: PostgreSQL connection settings
//! - [`transition`]: Academic-year transition rules and defaults
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`observability`]: Logging, tracing and metrics settings
//! - [`server`]: HTTP listener address
//!
//! Every config exposes `from_env()`, which falls back to defaults for unset
//! or unparseable variables, and `from_lookup()`, which reads through a
//! caller-provided function so parsing can be exercised without touching the
//! process environment.
//!
//! # Example
//!
//! ```ignore
//! use scholaris_config::{CorsConfig, TransitionConfig};
//!
//! let transition_config = TransitionConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod observability;
pub mod server;
pub mod transition;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use observability::ObservabilityConfig;
pub use server::ServerConfig;
pub use transition::TransitionConfig;

/// Reads `key` through `lookup` and parses it, ignoring unparseable values.
pub(crate) fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
