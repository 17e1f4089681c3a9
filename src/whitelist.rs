//! Whitelist collaborator contract
//!
//! The discovery core consults an external allow-list keyed by host but does
//! not own or persist it. Lookup never fails; an unknown host simply has no
//! record.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-host whitelist record.
///
/// The empty record (`WhitelistRecord::default()`) is what a caller receives
/// when it requested whitelist data for a host without an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistRecord {
    /// Matched domain entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Relation tags this host is approved to serve
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rels: Vec<String>,
}

/// Capability to look up a host in the whitelist.
pub trait WhitelistStore: Send + Sync {
    /// Find the record for `host`, if any. Never fails.
    fn lookup(&self, host: &str) -> Option<WhitelistRecord>;
}

/// In-memory whitelist keyed by domain, with subdomain suffix matching.
#[derive(Debug, Clone, Default)]
pub struct StaticWhitelist {
    records: HashMap<String, WhitelistRecord>,
}

impl StaticWhitelist {
    /// Create an empty whitelist; every lookup yields `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record under its domain.
    pub fn insert(&mut self, domain: impl Into<String>, rels: Vec<String>) {
        let domain = domain.into();
        let record = WhitelistRecord {
            domain: Some(domain.clone()),
            rels,
        };
        self.records.insert(domain, record);
    }
}

impl WhitelistStore for StaticWhitelist {
    fn lookup(&self, host: &str) -> Option<WhitelistRecord> {
        if let Some(record) = self.records.get(host) {
            return Some(record.clone());
        }
        // Walk up the label chain so www.example.com hits an example.com entry.
        let mut rest = host;
        while let Some(idx) = rest.find('.') {
            rest = &rest[idx + 1..];
            if let Some(record) = self.records.get(rest) {
                return Some(record.clone());
            }
        }
        None
    }
}
