//! Meta normalization
//!
//! This module turns the raw page signals delivered by the fetch collaborator
//! into a [`MetaMapping`]: every raw value stays reachable under its source
//! namespace (`og.*`, `twitter.*`, `meta.*`, `oembed.*`) while a canonical
//! view resolves the fixed attribute vocabulary across sources by precedence.
//! Normalization never fails; absent data yields absent keys.

pub mod vocabulary;

pub use vocabulary::{meta_mappings, AttributeSpec, Source, VOCABULARY};

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Precedence-normalized view of a page's signals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetaMapping {
    oembed: Value,
    og: Value,
    twitter: Value,
    meta: Value,
    canonical: BTreeMap<String, String>,
}

impl MetaMapping {
    /// Normalize raw signals into namespaced trees plus the canonical view.
    ///
    /// `raw_meta` is the page tag tree (plain tags at the top level, Open
    /// Graph under `og`, Twitter Card under `twitter`); `raw_oembed` is the
    /// source oEmbed document when one was discovered.
    pub fn normalize(raw_meta: &Value, raw_oembed: Option<&Value>) -> Self {
        let meta = lowercase_keys(raw_meta);
        let og = meta.get("og").cloned().unwrap_or(Value::Null);
        let twitter = meta.get("twitter").cloned().unwrap_or(Value::Null);
        let oembed = raw_oembed.map(lowercase_keys).unwrap_or(Value::Null);

        let mut mapping = Self {
            oembed,
            og,
            twitter,
            meta,
            canonical: BTreeMap::new(),
        };

        for attr in VOCABULARY {
            for (source, path) in attr.sources {
                if let Some(value) = mapping.get_str(*source, path) {
                    mapping.canonical.insert(attr.name.to_string(), value);
                    break;
                }
            }
        }

        debug!(
            attributes = mapping.canonical.len(),
            "normalized meta mapping"
        );
        mapping
    }

    /// The canonical attribute view (first present source wins per key).
    pub fn canonical(&self) -> &BTreeMap<String, String> {
        &self.canonical
    }

    /// Canonical value for a vocabulary key.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.canonical.get(name).map(String::as_str)
    }

    /// Raw Open Graph tree.
    pub fn og(&self) -> &Value {
        &self.og
    }

    /// Raw Twitter Card tree.
    ///
    /// Exposed whole so a caller can serve a twitter-card view without
    /// re-fetching the page.
    pub fn twitter(&self) -> &Value {
        &self.twitter
    }

    /// Raw generic meta tree.
    pub fn meta(&self) -> &Value {
        &self.meta
    }

    /// Raw oEmbed document.
    pub fn oembed(&self) -> &Value {
        &self.oembed
    }

    /// Raw value at a lower-case dotted path inside a source namespace.
    pub fn get(&self, source: Source, path: &str) -> Option<&Value> {
        let mut node = match source {
            Source::Oembed => &self.oembed,
            Source::Og => &self.og,
            Source::Twitter => &self.twitter,
            Source::Meta => &self.meta,
        };
        for segment in path.split('.') {
            node = node.get(segment.to_lowercase())?;
        }
        Some(node)
    }

    /// Scalar string at a dotted path inside a source namespace.
    ///
    /// Tags like `og:image` may appear as a plain string, as an object
    /// carrying `url`/`secure_url`/`src`, or as an array of either; this
    /// resolves all of those to the primary string value.
    pub fn get_str(&self, source: Source, path: &str) -> Option<String> {
        self.get(source, path).and_then(scalar)
    }
}

/// Resolve a raw node to its primary scalar string.
pub(crate) fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.first().and_then(scalar),
        Value::Object(map) => ["url", "secure_url", "src", "href"]
            .iter()
            .find_map(|key| map.get(*key).and_then(scalar)),
        _ => None,
    }
}

/// Deep-copy a value with all object keys lower-cased.
fn lowercase_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(lowercase_keys).collect()),
        other => other.clone(),
    }
}
