//! Canonical attribute vocabulary
//!
//! Defines the fixed set of canonical meta attributes and, for each, the
//! namespaced paths probed per source. Probe order encodes the fixed source
//! precedence: explicit oEmbed beats Open Graph beats Twitter Card beats
//! generic meta. The table is process-lifetime static data.

use serde::Serialize;
use serde_json::{json, Value};

/// Signal source namespaces, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// oEmbed document discovered on the page
    Oembed,
    /// Open Graph tags (`og:*`)
    Og,
    /// Twitter Card tags (`twitter:*`)
    Twitter,
    /// Generic HTML meta tags
    Meta,
}

impl Source {
    /// Namespace key used in exports and raw lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Oembed => "oembed",
            Source::Og => "og",
            Source::Twitter => "twitter",
            Source::Meta => "meta",
        }
    }
}

/// One canonical attribute and its per-source probe paths.
pub struct AttributeSpec {
    /// Canonical key (lower-case dotted path)
    pub name: &'static str,
    /// Probes in precedence order
    pub sources: &'static [(Source, &'static str)],
}

/// The fixed attribute vocabulary.
pub const VOCABULARY: &[AttributeSpec] = &[
    AttributeSpec {
        name: "title",
        sources: &[
            (Source::Oembed, "title"),
            (Source::Og, "title"),
            (Source::Twitter, "title"),
            (Source::Meta, "title"),
        ],
    },
    AttributeSpec {
        name: "description",
        sources: &[
            (Source::Og, "description"),
            (Source::Twitter, "description"),
            (Source::Meta, "description"),
        ],
    },
    AttributeSpec {
        name: "image",
        sources: &[
            (Source::Oembed, "thumbnail_url"),
            (Source::Og, "image"),
            (Source::Twitter, "image"),
        ],
    },
    AttributeSpec {
        name: "author",
        sources: &[(Source::Oembed, "author_name"), (Source::Meta, "author")],
    },
    AttributeSpec {
        name: "site_name",
        sources: &[
            (Source::Oembed, "provider_name"),
            (Source::Og, "site_name"),
            (Source::Twitter, "site"),
        ],
    },
    AttributeSpec {
        name: "canonical",
        sources: &[(Source::Og, "url"), (Source::Meta, "canonical")],
    },
    AttributeSpec {
        name: "keywords",
        sources: &[(Source::Meta, "keywords")],
    },
    AttributeSpec {
        name: "icon",
        sources: &[(Source::Meta, "favicon")],
    },
];

/// Export the vocabulary as `{attributes, sources}`.
///
/// `attributes` lists the canonical keys; `sources` maps each key to its
/// namespaced probe paths in precedence order.
pub fn meta_mappings() -> Value {
    let attributes: Vec<&str> = VOCABULARY.iter().map(|a| a.name).collect();
    let mut sources = serde_json::Map::new();
    for attr in VOCABULARY {
        let probes: Vec<String> = attr
            .sources
            .iter()
            .map(|(source, path)| format!("{}.{}", source.as_str(), path))
            .collect();
        sources.insert(attr.name.to_string(), json!(probes));
    }
    json!({
        "attributes": attributes,
        "sources": sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_keys_are_lowercase() {
        for attr in VOCABULARY {
            assert_eq!(attr.name, attr.name.to_lowercase());
            assert!(!attr.sources.is_empty());
        }
    }

    #[test]
    fn test_precedence_order_within_attributes() {
        // Probe lists must never rank a weaker source above a stronger one.
        fn rank(source: Source) -> u8 {
            match source {
                Source::Oembed => 0,
                Source::Og => 1,
                Source::Twitter => 2,
                Source::Meta => 3,
            }
        }
        for attr in VOCABULARY {
            let ranks: Vec<u8> = attr.sources.iter().map(|(s, _)| rank(*s)).collect();
            let mut sorted = ranks.clone();
            sorted.sort_unstable();
            assert_eq!(ranks, sorted, "attribute {} out of order", attr.name);
        }
    }

    #[test]
    fn test_meta_mappings_export() {
        let export = meta_mappings();
        let attributes = export["attributes"].as_array().unwrap();
        assert!(attributes.iter().any(|a| a == "title"));

        let title_sources = export["sources"]["title"].as_array().unwrap();
        assert_eq!(title_sources[0], "oembed.title");
        assert_eq!(title_sources[1], "og.title");
    }
}
