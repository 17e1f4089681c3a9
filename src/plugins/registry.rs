//! Plugin registry and URI routing
//!
//! The registry is built once at process start and is read-only afterward,
//! so concurrent lookups need no locking. Resolution order for a URI:
//! pattern-matched plugins first (registration order), then domain-suffix
//! matches, then the domain-agnostic generics. Resolution never fails; an
//! unmatched URI simply yields only the generic plugins.

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use super::{generic, sites, Plugin};

/// Builder collecting plugins before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    plugins: Vec<Box<dyn Plugin>>,
}

impl RegistryBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin. Registration order is preserved into resolution order.
    pub fn register(mut self, plugin: Box<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Freeze into an immutable registry.
    pub fn build(self) -> PluginRegistry {
        debug!(plugins = self.plugins.len(), "plugin registry built");
        PluginRegistry {
            plugins: self.plugins,
        }
    }
}

/// Immutable catalog of extraction plugins.
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    /// Registry preloaded with the built-in plugin set: domain rules first,
    /// then the generic fallback extractors.
    pub fn with_defaults() -> Self {
        let mut builder = RegistryBuilder::new();
        for plugin in sites::default_plugins() {
            builder = builder.register(plugin);
        }
        for plugin in generic::default_plugins() {
            builder = builder.register(plugin);
        }
        builder.build()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Resolve the ordered plugin sequence applicable to `uri`.
    ///
    /// Generic plugins always participate. By default they are demoted to
    /// the tail so domain-specific contributions win first-seen conflicts;
    /// with `mix_all` they keep their registration-order position among the
    /// matches. Either way the resolved set is identical.
    pub fn resolve(&self, uri: &Url, mix_all: bool) -> Vec<&dyn Plugin> {
        let host = uri.host_str().unwrap_or("");
        let uri_str = uri.as_str();

        let mut matched: Vec<usize> = Vec::new();
        let mut seen: HashSet<usize> = HashSet::new();

        // Pattern matches run regardless of domain.
        for (idx, plugin) in self.plugins.iter().enumerate() {
            if plugin.patterns().iter().any(|re| re.is_match(uri_str)) {
                matched.push(idx);
                seen.insert(idx);
            }
        }

        // Domain suffix matches, skipping plugins already matched by pattern.
        for (idx, plugin) in self.plugins.iter().enumerate() {
            if seen.contains(&idx) {
                continue;
            }
            if let Some(domain) = plugin.domain() {
                if domain_matches(domain, host) {
                    matched.push(idx);
                    seen.insert(idx);
                }
            }
        }

        // Generic plugins: no domain, no patterns.
        let generic: Vec<usize> = self
            .plugins
            .iter()
            .enumerate()
            .filter(|(_, p)| p.domain().is_none() && p.patterns().is_empty())
            .map(|(idx, _)| idx)
            .collect();

        let order: Vec<usize> = if mix_all {
            let mut all: Vec<usize> = matched.into_iter().chain(generic).collect();
            all.sort_unstable();
            all
        } else {
            matched.into_iter().chain(generic).collect()
        };

        debug!(uri = uri_str, resolved = order.len(), "resolved plugins");
        order.into_iter().map(|idx| &*self.plugins[idx]).collect()
    }

    /// Flatten every plugin's routing info into a sorted descriptor list.
    ///
    /// Patterns export as-is (an inline `(?i)` prefix becomes the `i` flag);
    /// a pattern-less domain exports as its dot-escaped literal, once per
    /// distinct domain. Sorting is lexicographic over (source, flags) for
    /// determinism across runs.
    pub fn export_routing_table(&self) -> Vec<RoutingRule> {
        let mut rules: Vec<RoutingRule> = Vec::new();
        let mut seen_domains: HashSet<&str> = HashSet::new();

        for plugin in &self.plugins {
            if !plugin.patterns().is_empty() {
                for re in plugin.patterns() {
                    rules.push(RoutingRule::from_pattern(re.as_str()));
                }
            } else if let Some(domain) = plugin.domain() {
                if seen_domains.insert(domain) {
                    rules.push(RoutingRule {
                        source: domain.replace('.', "\\."),
                        flags: String::new(),
                    });
                }
            }
        }

        rules.sort();
        rules
    }
}

/// Exported routing descriptor: a regex source plus its flags.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RoutingRule {
    /// Regex source text
    pub source: String,
    /// Regex flags (`i` for case-insensitive, empty otherwise)
    pub flags: String,
}

impl RoutingRule {
    fn from_pattern(source: &str) -> Self {
        match source.strip_prefix("(?i)") {
            Some(rest) => Self {
                source: rest.to_string(),
                flags: "i".to_string(),
            },
            None => Self {
                source: source.to_string(),
                flags: String::new(),
            },
        }
    }
}

/// Suffix-match a plugin domain against a host: exact, or on a label boundary.
fn domain_matches(domain: &str, host: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}
