//! Shared domain types for appvet.
//!
//! This crate contains the vocabulary the rest of the workspace speaks:
//! decoded app manifests, the carriers that flow from discovery into
//! vetting, the rejection taxonomy, the report artifact, and the policy
//! allow-lists.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror,
//! schemars.

pub mod error;
pub mod manifest;
pub mod policy;
pub mod report;
