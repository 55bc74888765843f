//! Vetting rules and pipeline orchestration for appvet.
//!
//! This crate holds the algorithms: structural manifest checks, the
//! dependency graph, the closure validator, and the schema-check port that
//! the infrastructure layer implements. It depends only on `appvet-types`
//! -- never on `appvet-infra` or any IO crate.

pub mod closure;
pub mod graph;
pub mod manifest;
pub mod pipeline;
pub mod schema;
