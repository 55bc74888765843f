//! Infrastructure for appvet: everything that touches the outside world.
//!
//! Filesystem discovery of app manifests, the jsonschema-backed validator
//! behind the core schema-check port, and TOML run configuration.

pub mod config;
pub mod loader;
pub mod schema;
