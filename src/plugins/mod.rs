//! Extraction plugins
//!
//! A plugin is a named extraction rule producing candidate links from the
//! normalized meta mapping of a page. Plugins may restrict themselves to a
//! domain or a set of URL patterns; domain-agnostic plugins are the generic
//! fallback extractors. Plugins perform no I/O and are registered once at
//! startup into an immutable [`registry::PluginRegistry`].

pub mod generic;
pub mod registry;
pub mod sites;

pub use registry::{PluginRegistry, RegistryBuilder, RoutingRule};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::meta::MetaMapping;

/// Relation tags a link can carry.
///
/// Closed vocabulary: semantic roles (`player`, `image`, ...) plus
/// provenance markers (`og`, `twitter`, `oembed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rel {
    /// Embeddable media player
    Player,
    /// Representative image
    Image,
    /// Small preview image
    Thumbnail,
    /// Readable article rendition
    Reader,
    /// Downloadable file
    File,
    /// Site icon
    Icon,
    /// Alternate representation of the page
    Alternate,
    /// Extracted from Open Graph tags
    Og,
    /// Extracted from Twitter Card tags
    Twitter,
    /// Extracted from a source oEmbed document
    Oembed,
}

impl Rel {
    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rel::Player => "player",
            Rel::Image => "image",
            Rel::Thumbnail => "thumbnail",
            Rel::Reader => "reader",
            Rel::File => "file",
            Rel::Icon => "icon",
            Rel::Alternate => "alternate",
            Rel::Og => "og",
            Rel::Twitter => "twitter",
            Rel::Oembed => "oembed",
        }
    }
}

/// Default MIME type for links that do not declare one.
pub const TEXT_HTML: &str = "text/html";

/// Candidate link as emitted by a plugin.
///
/// `href` may be absent (a plugin probing `og.video.secure_url` emits the
/// candidate either way); such candidates are excluded before aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkCandidate {
    /// Absolute URI of the offered representation, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// MIME type; defaults to `text/html` at aggregation time
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Relation tags; duplicates allowed here, de-duplicated at aggregation
    pub rel: Vec<Rel>,
    /// Pixel width, pass-through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height, pass-through
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Additional type-specific descriptor, opaque to the aggregator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Value>,
}

/// Aggregated link: a discovered representation of the target URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URI of the offered representation
    pub href: String,
    /// MIME type
    #[serde(rename = "type")]
    pub media_type: String,
    /// De-duplicated relation tags in first-seen order
    pub rel: Vec<Rel>,
    /// Pixel width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixel height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Additional type-specific descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Value>,
}

impl Link {
    /// Whether this link carries the given relation tag.
    pub fn has_rel(&self, rel: Rel) -> bool {
        self.rel.contains(&rel)
    }
}

/// Per-invocation context handed to a plugin.
pub struct PluginContext<'a> {
    /// The target URI being discovered
    pub uri: &'a Url,
    /// Normalized page signals
    pub meta: &'a MetaMapping,
}

/// A named extraction rule.
///
/// Implementations must be pure functions of the context: no network I/O,
/// no shared mutable state. The registry treats a plugin with `patterns()`
/// as pattern-routed (patterns take precedence over `domain()` for routing
/// decisions); one with neither is a generic fallback extractor.
pub trait Plugin: Send + Sync {
    /// Stable plugin name, used in debug traces.
    fn name(&self) -> &'static str;

    /// Literal hostname suffix this plugin is restricted to.
    fn domain(&self) -> Option<&str> {
        None
    }

    /// URL patterns this plugin is routed by.
    fn patterns(&self) -> &[Regex] {
        &[]
    }

    /// Produce candidate links for the context.
    fn links(&self, ctx: &PluginContext<'_>) -> Result<Vec<LinkCandidate>>;
}
