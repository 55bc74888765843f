//! Store policy allow-lists.
//!
//! The closure rules consult two lists: dependency names satisfied by the
//! host instead of another store app, and permissions any container may
//! request without a backing dependency. Both are explicit configuration
//! rather than constants baked into the rules, so a store with a different
//! policy only has to ship a different config file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Allow-lists the vetting rules consult.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Dependency names resolved by the host, not by another store app.
    #[serde(default = "default_external_services")]
    pub external_services: BTreeSet<String>,
    /// Permissions granted by the system, needing no backing dependency.
    #[serde(default = "default_system_permissions")]
    pub system_permissions: BTreeSet<String>,
}

fn default_external_services() -> BTreeSet<String> {
    ["bitcoind", "lnd", "electrum"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_system_permissions() -> BTreeSet<String> {
    ["root", "hw"].into_iter().map(String::from).collect()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            external_services: default_external_services(),
            system_permissions: default_system_permissions(),
        }
    }
}

impl PolicyConfig {
    /// Whether `name` may be depended on without being a store app.
    pub fn allows_external_service(&self, name: &str) -> bool {
        self.external_services.contains(name)
    }

    /// Whether `permission` may be requested without a backing dependency.
    pub fn allows_system_permission(&self, permission: &str) -> bool {
        self.system_permissions.contains(permission)
    }
}
